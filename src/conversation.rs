//! Tracks which conversation thread each action belongs to, and who has
//! touched it. Both maps are keyed by action id and pruned every revision
//! down to the set of still-"alive" actions: those currently present on the
//! page, or recently deleted and therefore still eligible for restoration.
//! Directly grounded on `Conversation_Constructor.process`'s post-processing
//! loop and `clean_dict` in the original implementation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionType};
use crate::errors::ReconstructError;
use crate::page_state::PageState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMap {
    ids: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorshipMap {
    authors: HashMap<String, HashSet<(String, String)>>,
}

impl ConversationMap {
    pub fn get(&self, action_id: &str) -> Option<&str> {
        self.ids.get(action_id).map(|s| s.as_str())
    }

    pub fn set(&mut self, action_id: impl Into<String>, conversation_id: impl Into<String>) {
        self.ids.insert(action_id.into(), conversation_id.into());
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.ids.contains_key(action_id)
    }

    /// Drop every entry whose action id is neither live on the page nor in
    /// `deleted_records`.
    pub fn prune(&mut self, page: &PageState, deleted_records: &HashSet<String>) {
        let alive = alive_action_ids(page);
        self.ids.retain(|id, _| alive.contains(id.as_str()) || deleted_records.contains(id));
    }
}

impl AuthorshipMap {
    pub fn get(&self, action_id: &str) -> HashSet<(String, String)> {
        self.authors.get(action_id).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, action_id: impl Into<String>, authors: HashSet<(String, String)>) {
        self.authors.insert(action_id.into(), authors);
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.authors.contains_key(action_id)
    }

    pub fn prune(&mut self, page: &PageState, deleted_records: &HashSet<String>) {
        let alive = alive_action_ids(page);
        self.authors.retain(|id, _| alive.contains(id.as_str()) || deleted_records.contains(id));
    }
}

fn alive_action_ids(page: &PageState) -> HashSet<String> {
    page.actions
        .values()
        .filter_map(|entry| entry.action_id().map(|s| s.to_string()))
        .collect()
}

/// Apply the conversation-id and authorship update rules for one freshly
/// classified action, mutating both maps and filling in `action`'s
/// `conversation_id`/`authors` fields. Fails with `UnknownActionId` if the
/// action names a `replyTo_id`/`parent_id` that isn't registered in either
/// map — a missing required parent is surfaced, never silently treated as
/// its own root.
pub fn annotate(
    action: &mut Action,
    conversations: &mut ConversationMap,
    authorship: &mut AuthorshipMap,
) -> Result<(), ReconstructError> {
    match action.action_type {
        ActionType::CommentAdding | ActionType::CommentModification | ActionType::SectionCreation => {
            let conv = match &action.reply_to_id {
                None => action.id.clone(),
                Some(reply_to) => conversations
                    .get(reply_to)
                    .ok_or_else(|| ReconstructError::UnknownActionId(reply_to.clone()))?
                    .to_string(),
            };
            conversations.set(action.id.clone(), conv);

            let authors = if action.action_type == ActionType::CommentModification {
                let parent_id = required_parent(action)?;
                if !authorship.contains(parent_id) {
                    return Err(ReconstructError::UnknownActionId(parent_id.to_string()));
                }
                let mut authors = authorship.get(parent_id);
                authors.insert((action.user_id.clone(), action.user_text.clone()));
                authors
            } else {
                HashSet::from([(action.user_id.clone(), action.user_text.clone())])
            };
            authorship.set(action.id.clone(), authors);
        }
        ActionType::CommentRearrangement => {
            let conv = match &action.reply_to_id {
                None => action.id.clone(),
                Some(reply_to) => conversations
                    .get(reply_to)
                    .ok_or_else(|| ReconstructError::UnknownActionId(reply_to.clone()))?
                    .to_string(),
            };
            conversations.set(action.id.clone(), conv);
            let parent_id = required_parent(action)?;
            if !authorship.contains(parent_id) {
                return Err(ReconstructError::UnknownActionId(parent_id.to_string()));
            }
            authorship.set(action.id.clone(), authorship.get(parent_id));
        }
        ActionType::CommentRemoval | ActionType::CommentRestoration => {
            let parent_id = required_parent(action)?;
            let conv = conversations
                .get(parent_id)
                .ok_or_else(|| ReconstructError::UnknownActionId(parent_id.to_string()))?
                .to_string();
            conversations.set(action.id.clone(), conv);
            if !authorship.contains(parent_id) {
                return Err(ReconstructError::UnknownActionId(parent_id.to_string()));
            }
            authorship.set(action.id.clone(), authorship.get(parent_id));
        }
    }

    action.conversation_id = conversations.get(&action.id).map(|s| s.to_string());
    action.authors = authorship.get(&action.id).into_iter().collect();
    action.authors.sort();
    Ok(())
}

/// `parent_id` for an action kind that must carry one. Classified
/// modifications, rearrangements, removals and restorations always set
/// this field; its absence means the action itself is malformed.
fn required_parent(action: &Action) -> Result<&str, ReconstructError> {
    action
        .parent_id
        .as_deref()
        .ok_or_else(|| ReconstructError::UnknownActionId(action.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn action(id: &str, action_type: ActionType, parent_id: Option<&str>, reply_to_id: Option<&str>) -> Action {
        Action {
            id: id.to_string(),
            action_type,
            parent_id: parent_id.map(str::to_string),
            reply_to_id: reply_to_id.map(str::to_string),
            indentation: 0,
            content: Vec::new(),
            user_id: "7".to_string(),
            user_text: "Alice".to_string(),
            timestamp: Utc::now(),
            rev_id: 1,
            page_id: "p1".to_string(),
            page_title: "Talk:Example".to_string(),
            conversation_id: None,
            authors: Vec::new(),
        }
    }

    #[test]
    fn root_addition_starts_its_own_conversation() {
        let mut conversations = ConversationMap::default();
        let mut authorship = AuthorshipMap::default();
        let mut a = action("1.0", ActionType::CommentAdding, None, None);
        annotate(&mut a, &mut conversations, &mut authorship).unwrap();
        assert_eq!(a.conversation_id.as_deref(), Some("1.0"));
        assert_eq!(a.authors, vec![("7".to_string(), "Alice".to_string())]);
    }

    #[test]
    fn reply_inherits_parents_conversation() {
        let mut conversations = ConversationMap::default();
        let mut authorship = AuthorshipMap::default();
        let mut root = action("1.0", ActionType::CommentAdding, None, None);
        annotate(&mut root, &mut conversations, &mut authorship).unwrap();

        let mut reply = action("1.1", ActionType::CommentAdding, None, Some("1.0"));
        annotate(&mut reply, &mut conversations, &mut authorship).unwrap();
        assert_eq!(reply.conversation_id.as_deref(), Some("1.0"));
    }

    #[test]
    fn modification_merges_authors_with_parent() {
        let mut conversations = ConversationMap::default();
        let mut authorship = AuthorshipMap::default();
        let mut root = action("1.0", ActionType::CommentAdding, None, None);
        annotate(&mut root, &mut conversations, &mut authorship).unwrap();

        let mut edit = action("2.0", ActionType::CommentModification, Some("1.0"), None);
        edit.user_id = "9".to_string();
        edit.user_text = "Bob".to_string();
        annotate(&mut edit, &mut conversations, &mut authorship).unwrap();
        assert_eq!(edit.authors.len(), 2);
    }

    #[test]
    fn modification_with_unknown_parent_is_an_error() {
        let mut conversations = ConversationMap::default();
        let mut authorship = AuthorshipMap::default();
        let mut edit = action("2.0", ActionType::CommentModification, Some("missing"), None);
        let err = annotate(&mut edit, &mut conversations, &mut authorship).unwrap_err();
        assert!(matches!(err, ReconstructError::UnknownActionId(id) if id == "missing"));
    }

    #[test]
    fn reply_to_unknown_action_is_an_error() {
        let mut conversations = ConversationMap::default();
        let mut authorship = AuthorshipMap::default();
        let mut reply = action("1.1", ActionType::CommentAdding, None, Some("missing"));
        let err = annotate(&mut reply, &mut conversations, &mut authorship).unwrap_err();
        assert!(matches!(err, ReconstructError::UnknownActionId(id) if id == "missing"));
    }

    #[test]
    fn prune_drops_dead_non_deleted_actions() {
        let mut conversations = ConversationMap::default();
        conversations.set("1.0", "1.0");
        conversations.set("2.0", "1.0");
        let page = PageState::new("p1", "Talk:Example");
        conversations.prune(&page, &HashSet::new());
        assert!(conversations.get("1.0").is_none());
        assert!(conversations.get("2.0").is_none());
    }
}
