//! Fragment graph module: wire shapes, capabilities, and the
//! resolver/builder pair that walk the graph in opposite directions.

mod builder;
mod capability;
mod payload;
mod record;
mod reference;
mod resolver;
pub mod schema;

pub use builder::{build_page, BuildOptions};
pub use capability::{FragmentSink, FragmentSource};
pub use payload::{FieldPayload, FieldType, FragmentPayload};
pub use record::{Element, ElementValue, FragmentRecord, ModelRef, RecordProperties};
pub use reference::{Reference, VersionTag};
pub use resolver::{resolve, resolve_record};
