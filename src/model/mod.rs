//! Canonical page tree shared by every transcoding direction.
//!
//! This module defines the intermediate representation that bridges HTML
//! parsing, HTML rendering, fragment-graph resolution, and fragment-graph
//! building. The model is source-agnostic: the same tree comes out of a
//! markup parse and out of a resolved fragment graph.

mod kind;
mod node;

pub use kind::{NodeKind, TitleLevel};
pub use node::Node;
