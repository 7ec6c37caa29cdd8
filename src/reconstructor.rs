//! The per-page state machine that ties tokenizer, differ, classifier and
//! conversation tracker together. Grounded on `Conversation_Constructor` in
//! the original implementation: one instance owns exactly one page's state
//! and is fed revisions strictly in order.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::action::Action;
use crate::checkpoint::CheckpointBlob;
use crate::classifier::{classify, DeletedComment};
use crate::config::ReconstructConfig;
use crate::conversation::{annotate, AuthorshipMap, ConversationMap};
use crate::deleted_index::DeletedIndex;
use crate::diff::diff;
use crate::errors::ReconstructError;
use crate::page_state::PageState;
use crate::revision::Revision;
use crate::token::tokenize;

pub struct Reconstructor {
    page_id: String,
    page: PageState,
    latest_content: String,
    deleted_index: DeletedIndex,
    deleted_comments: Vec<DeletedComment>,
    conversations: ConversationMap,
    authorship: AuthorshipMap,
    config: ReconstructConfig,
    last_rev_id: Option<i64>,
}

impl Reconstructor {
    /// A brand-new page, not yet touched by any revision.
    pub fn new(page_id: impl Into<String>, page_title: impl Into<String>, config: ReconstructConfig) -> Self {
        let page_id = page_id.into();
        Self {
            page: PageState::new(page_id.clone(), page_title),
            page_id,
            latest_content: String::new(),
            deleted_index: DeletedIndex::new(),
            deleted_comments: Vec::new(),
            conversations: ConversationMap::default(),
            authorship: AuthorshipMap::default(),
            config,
            last_rev_id: None,
        }
    }

    /// Restore a page exactly where a previous checkpoint left off.
    pub fn load(blob: CheckpointBlob, config: ReconstructConfig) -> Self {
        let mut deleted_index = DeletedIndex::new();
        for comment in &blob.deleted_comments {
            deleted_index.add(comment.text.clone(), (comment.action_id.clone(), comment.indentation));
        }
        Self {
            page_id: blob.page_id,
            page: blob.page_state,
            latest_content: blob.latest_content,
            deleted_index,
            deleted_comments: blob.deleted_comments,
            conversations: blob.conversations,
            authorship: blob.authorship,
            config,
            last_rev_id: Some(blob.rev_id),
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Process one revision, returning the actions it produced and a fresh
    /// checkpoint blob. On error, `self` is left exactly as it was before the
    /// call.
    #[instrument(skip(self, rev), fields(page_id = %rev.page_id, rev_id = rev.rev_id))]
    pub fn process(&mut self, rev: &Revision) -> Result<(CheckpointBlob, Vec<Action>), ReconstructError> {
        if rev.page_id != self.page_id {
            return Err(ReconstructError::MalformedRevision(format!(
                "revision page_id `{}` does not match reconstructor's page_id `{}`",
                rev.page_id, self.page_id
            )));
        }
        if let Some(last) = self.last_rev_id {
            if rev.rev_id <= last {
                return Err(ReconstructError::MalformedRevision(format!(
                    "revision {} does not advance past last-processed revision {}",
                    rev.rev_id, last
                )));
            }
        }

        let old_tokens = tokenize(&self.latest_content);
        let new_tokens = tokenize(&rev.text);
        let ops = diff(&old_tokens, &new_tokens, self.config.break_boundary_required);

        let mut deleted_index = self.deleted_index.clone();
        let mut deleted_comments = self.deleted_comments.clone();
        let (mut actions, page) = classify(
            rev,
            &self.page,
            &ops,
            &new_tokens,
            &mut deleted_index,
            &mut deleted_comments,
            &self.config,
        )?;

        let mut conversations = self.conversations.clone();
        let mut authorship = self.authorship.clone();
        for action in &mut actions {
            annotate(action, &mut conversations, &mut authorship)?;
        }

        let deleted_records: HashSet<String> =
            deleted_comments.iter().map(|c| c.action_id.clone()).collect();
        conversations.prune(&page, &deleted_records);
        authorship.prune(&page, &deleted_records);

        if let Some(revisions) = self.config.deleted_retention_revisions {
            let cutoff = rev.rev_id.saturating_sub(revisions as i64);
            deleted_index.retain(|(action_id, _)| action_rev(action_id) > cutoff);
            deleted_comments.retain(|c| action_rev(&c.action_id) > cutoff);
        }

        debug!(action_count = actions.len(), "revision classified");

        self.page = page.clone();
        self.latest_content = rev.text.clone();
        self.deleted_index = deleted_index;
        self.deleted_comments = deleted_comments.clone();
        self.conversations = conversations.clone();
        self.authorship = authorship.clone();
        self.last_rev_id = Some(rev.rev_id);

        let blob = CheckpointBlob {
            rev_id: rev.rev_id,
            timestamp: rev.timestamp,
            page_id: self.page_id.clone(),
            page_state: page,
            deleted_comments,
            conversations,
            authorship,
            latest_content: self.latest_content.clone(),
        };

        Ok((blob, actions))
    }
}

fn action_rev(action_id: &str) -> i64 {
    action_id.split('.').next().and_then(|s| s.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rev(rev_id: i64, text: &str) -> Revision {
        Revision {
            rev_id,
            timestamp: Utc::now(),
            page_id: "p1".to_string(),
            page_title: "Talk:Example".to_string(),
            user_id: "1".to_string(),
            user_text: "Alice".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn rejects_out_of_order_revisions() {
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        r.process(&rev(5, "== Topic ==\n:Hi.\n")).unwrap();
        let err = r.process(&rev(5, "== Topic ==\n:Hi.\n")).unwrap_err();
        assert!(matches!(err, ReconstructError::MalformedRevision(_)));
    }

    #[test]
    fn checkpoint_round_trip_resumes_identically() {
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        let (blob, _) = r.process(&rev(1, "== Topic ==\n:Hi.\n")).unwrap();

        let mut resumed = Reconstructor::load(blob, ReconstructConfig::default());
        let (_, actions) = resumed.process(&rev(2, "== Topic ==\n:Hi.\n::Reply.\n")).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].indentation, 2);
    }
}
