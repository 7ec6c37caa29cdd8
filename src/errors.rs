//! Error types for the Conversation Reconstructor crate.
//!
//! This module defines a unified error enumeration used across revision
//! ingestion, diffing, classification, and checkpoint (de)serialization. It
//! integrates with `thiserror` to provide rich `Display` implementations and
//! error source chaining where applicable.
//!
//! Notes:
//! - Each variant carries contextual details via its message payload.
//! - `Reconstructor::process` never mutates `self` before every phase has
//!   succeeded, so any of these errors leaves the pre-revision state intact.

use thiserror::Error;

#[derive(Error, Debug)]
/// Unified error enumeration for the Conversation Reconstructor library.
pub enum ReconstructError {
    /// A revision is missing a required field or its timestamp does not
    /// advance past the page's last-processed revision.
    #[error("malformed revision `{0}`")]
    MalformedRevision(String),

    /// A page-state invariant ((i)-(iv) from the data model) was violated
    /// after classification finished.
    #[error("page state invariant violated: {0}")]
    InvariantViolation(String),

    /// Diff op indices fell outside the bounds of the supplied token
    /// sequences.
    #[error("diff inconsistency: {0}")]
    DiffInconsistency(String),

    /// A conversation/authorship lookup referenced an action id that is not
    /// registered. Treated as an invariant violation by callers.
    #[error("unknown action id: {0}")]
    UnknownActionId(String),

    /// Checkpoint blob failed to (de)serialize.
    #[error("checkpoint codec error: {0}")]
    CheckpointError(String),

    /// I/O error from the surrounding glue (checkpoint storage, demos).
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
