//! Rendering module for converting node trees back to HTML.

mod html;
mod links;
mod options;

pub use html::{to_html, HtmlRenderer};
pub use links::rewrite_asset_links;
pub use options::RenderOptions;
