//! Capability traits the transcoder core depends on.
//!
//! Transport, authentication and endpoint layout live behind these traits;
//! the resolver and builder never see them. Implementations must be safe to
//! share across the fan-out: child fetches and writes of one container run
//! concurrently against the same instance.

use crate::error::Result;
use crate::fragment::payload::FragmentPayload;
use crate::fragment::record::FragmentRecord;
use crate::fragment::reference::{Reference, VersionTag};
use crate::model::NodeKind;

/// Read access to the fragment graph.
#[async_trait::async_trait]
pub trait FragmentSource: Send + Sync {
    /// Fetch the record a reference points at.
    ///
    /// Fails with [`NotFound`](crate::Error::NotFound) when nothing lives at
    /// the reference and [`Transport`](crate::Error::Transport) for
    /// connection-level trouble.
    async fn dereference(&self, reference: &Reference) -> Result<FragmentRecord>;
}

/// Write access to the fragment graph.
#[async_trait::async_trait]
pub trait FragmentSink: Send + Sync {
    /// Create one fragment record, returning its address.
    ///
    /// The node kind is passed alongside the payload so implementations can
    /// route per kind and report
    /// [`RejectedPayload`](crate::Error::RejectedPayload) precisely.
    async fn write(&self, kind: NodeKind, payload: FragmentPayload) -> Result<Reference>;

    /// Resolve a page path to the reference of its existing root record.
    async fn lookup(&self, page_path: &str) -> Result<Reference>;

    /// Current version tag of a record.
    async fn version_tag(&self, reference: &Reference) -> Result<VersionTag>;

    /// Replace the root record, conditioned on the tag still being current.
    ///
    /// A stale tag fails with
    /// [`VersionConflict`](crate::Error::VersionConflict); the remote state
    /// is then unchanged and the caller may re-fetch and retry.
    async fn update_root(
        &self,
        reference: &Reference,
        payload: FragmentPayload,
        expected: &VersionTag,
    ) -> Result<Reference>;
}
