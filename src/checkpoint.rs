//! Serializes/deserializes everything a [`crate::reconstructor::Reconstructor`]
//! needs to resume a page from exactly where the last processed revision
//! left off: page state, the deleted-comment list, conversation ids,
//! authorship, and the latest raw page text. One blob per `(page_id,
//! rev_id)`, opaque to callers beyond this codec.

use serde::{Deserialize, Serialize};

use crate::classifier::DeletedComment;
use crate::conversation::{AuthorshipMap, ConversationMap};
use crate::errors::ReconstructError;
use crate::page_state::PageState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointBlob {
    pub rev_id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub page_id: String,
    pub page_state: PageState,
    pub deleted_comments: Vec<DeletedComment>,
    pub conversations: ConversationMap,
    pub authorship: AuthorshipMap,
    pub latest_content: String,
}

impl CheckpointBlob {
    pub fn encode(&self) -> Result<Vec<u8>, ReconstructError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ReconstructError> {
        serde_json::from_slice(bytes).map_err(ReconstructError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn round_trips_through_json() {
        let blob = CheckpointBlob {
            rev_id: 42,
            timestamp: Utc::now(),
            page_id: "p1".to_string(),
            page_state: PageState::new("p1", "Talk:Example"),
            deleted_comments: vec![DeletedComment {
                text: "old remark".to_string(),
                action_id: "1.0".to_string(),
                indentation: 1,
            }],
            conversations: ConversationMap::default(),
            authorship: AuthorshipMap::default(),
            latest_content: "== Topic ==\n".to_string(),
        };

        let bytes = blob.encode().unwrap();
        let decoded = CheckpointBlob::decode(&bytes).unwrap();
        assert_eq!(decoded.rev_id, 42);
        assert_eq!(decoded.latest_content, blob.latest_content);
        assert_eq!(decoded.deleted_comments.len(), 1);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(CheckpointBlob::decode(b"not json").is_err());
    }
}
