//! HTML parsing module.

mod events;
mod extractor;

pub use events::{HtmlEvents, StructuralEvent};
pub use extractor::{parse_events, parse_html, StructuralExtractor};
