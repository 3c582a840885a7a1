//! Error types for the fragmark library.

use thiserror::Error;

use crate::model::NodeKind;

/// Result type alias for fragmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while transcoding between HTML and fragments.
#[derive(Error, Debug)]
pub enum Error {
    /// A node kind appeared where the content grammar does not allow it.
    ///
    /// This is schema drift, not an I/O condition: a well-formed tree never
    /// produces it, and callers should not catch and mask it.
    #[error("unsupported node kind {kind} in {context}")]
    UnsupportedNodeKind {
        /// The out-of-place node kind.
        kind: NodeKind,
        /// Container position the node appeared in.
        context: &'static str,
    },

    /// A fragment record carried a model identifier this crate does not know.
    #[error("unknown fragment model: {0}")]
    UnknownModel(String),

    /// A fragment record is missing a required element or has the wrong shape.
    #[error("malformed fragment record at {reference}: {detail}")]
    MalformedRecord {
        /// Reference the record was fetched from.
        reference: String,
        /// What was missing or mis-shaped.
        detail: String,
    },

    /// The content source has no fragment at the given reference.
    #[error("fragment not found: {0}")]
    NotFound(String),

    /// The transport layer behind a capability failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote system refused a write payload.
    #[error("payload rejected for {kind}: {detail}")]
    RejectedPayload {
        /// Kind of node whose payload was refused.
        kind: NodeKind,
        /// Remote-provided reason, verbatim.
        detail: String,
    },

    /// The root update was conditioned on a version tag that is no longer
    /// current. Callers may re-fetch the tag and retry; this crate does not.
    #[error("version conflict on {reference}: expected tag {expected}")]
    VersionConflict {
        /// Reference of the record that moved underneath the update.
        reference: String,
        /// The stale tag the update was conditioned on.
        expected: String,
    },
}

impl Error {
    /// True for failures that originate in the injected I/O capabilities
    /// rather than in this crate's own decoding or grammar checks.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Transport(_) | Error::VersionConflict { .. }
        )
    }
}
