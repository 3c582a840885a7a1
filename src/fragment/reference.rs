//! Addresses of fragment records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque address of a fragment record.
///
/// A write returns one, and a parent record embeds its children's. Holding a
/// reference means the record it names already exists, which is what forces
/// the bottom-up write order in the builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// Wrap a reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reference {
    fn from(reference: &str) -> Self {
        Self(reference.to_string())
    }
}

impl From<String> for Reference {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

/// Version tag guarding the conditional root update.
///
/// Fetched immediately before the update and passed back verbatim; the
/// remote compares, this crate never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
