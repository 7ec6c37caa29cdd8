//! The input record a caller feeds to a [`crate::reconstructor::Reconstructor`]
//! one at a time, in ascending `timestamp` order per `page_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub rev_id: i64,
    pub timestamp: DateTime<Utc>,
    pub page_id: String,
    pub page_title: String,
    pub user_id: String,
    pub user_text: String,
    /// Already HTML-cleaned by a collaborator upstream of the core.
    pub text: String,
}
