//! The `Action` record: an immutable, per-revision event produced by the
//! classifier and annotated by the conversation/authorship tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::token::{join, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    CommentAdding,
    CommentModification,
    CommentRemoval,
    CommentRestoration,
    CommentRearrangement,
    SectionCreation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub parent_id: Option<String>,
    #[serde(rename = "replyTo_id")]
    pub reply_to_id: Option<String>,
    pub indentation: i64,
    pub content: Vec<Token>,
    pub user_id: String,
    pub user_text: String,
    pub timestamp: DateTime<Utc>,
    pub rev_id: i64,
    pub page_id: String,
    pub page_title: String,
    /// Filled in by the conversation tracker right after the action is
    /// emitted; absent on a freshly-built, not-yet-registered action.
    pub conversation_id: Option<String>,
    /// `(user_id, user_text)` pairs; filled in alongside `conversation_id`.
    pub authors: Vec<(String, String)>,
}

impl Action {
    pub fn content_text(&self) -> String {
        join(&self.content)
    }
}

/// Parse the `<rev_id>.<seq>` sequence number back out of an action id, used
/// by Phase H to sort emitted actions by creation order.
pub fn action_seq(id: &str) -> i64 {
    id.rsplit('.').next().and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Build the `<rev_id>.<seq>` id for the `seq`-th action created in a
/// revision.
pub fn make_action_id(rev_id: i64, seq: usize) -> String {
    format!("{rev_id}.{seq}")
}
