//! Tunable knobs for the conversation reconstructor, enumerated in full by
//! the external-interfaces section of the design: restoration/rearrangement
//! thresholds, whether break-boundary alignment is required for a new
//! comment, and how long deleted comments stay eligible for restoration.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReconstructConfig {
    /// Minimum token length of a removed comment before it is eligible for
    /// restoration-matching later on (and recorded into the deleted index
    /// at all).
    pub restoration_min_tokens: usize,
    /// Minimum token length of a removed comment before it is considered a
    /// candidate for a same-revision rearrangement match.
    pub rearrangement_min_tokens: usize,
    /// Whether a new-comment insertion must start and end on break-token
    /// boundaries to be classified as an addition rather than a
    /// modification.
    pub break_boundary_required: bool,
    /// How many revisions a deleted comment remains in the deleted index
    /// before it is evicted regardless of content length. `None` means the
    /// index is bounded only by which ids are still referenced (memory-
    /// bounded, per the resource model).
    pub deleted_retention_revisions: Option<u64>,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            restoration_min_tokens: 10,
            rearrangement_min_tokens: 10,
            break_boundary_required: true,
            deleted_retention_revisions: None,
        }
    }
}
