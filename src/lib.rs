//! # fragmark
//!
//! Bidirectional transcoder between rendered HTML and typed content-fragment
//! graphs.
//!
//! One direction parses rendered HTML into a canonical page tree through a
//! fixed positional grammar; the other walks a graph of fragment records
//! wired by references into the same tree. The tree renders back to exact
//! HTML, and writes back into the graph bottom-up with the parent embedding
//! its children's returned references.
//!
//! ## Quick Start
//!
//! ```
//! use fragmark::{parse_html, to_html, RenderOptions};
//!
//! let page = parse_html("<main><div><h1>Hi</h1><p>Body</p></div></main>");
//! let html = to_html(&page, &RenderOptions::default())?;
//! assert!(html.contains("<h1>Hi</h1>"));
//! # Ok::<(), fragmark::Error>(())
//! ```
//!
//! Graph operations run against capabilities the caller injects:
//!
//! ```no_run
//! use fragmark::{resolve_to_html, Reference, RenderOptions};
//!
//! # async fn demo(source: &dyn fragmark::FragmentSource) -> fragmark::Result<()> {
//! let reference = Reference::new("/content/dam/fragments/home");
//! let html = resolve_to_html(source, &reference, &RenderOptions::default()).await?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Permissive parsing**: malformed markup degrades, it never errors
//! - **Exact rendering**: byte-stable emission, round-trippable with the parser
//! - **Concurrent graph walks**: per-container fan-out with fail-fast joins
//! - **Bottom-up writes**: a parent is written only after all its children
//! - **Guarded root update**: version-tag conditioning, conflicts surface typed

pub mod error;
pub mod fragment;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fragment::{
    build_page, resolve, resolve_record, BuildOptions, FieldPayload, FieldType, FragmentPayload,
    FragmentRecord, FragmentSink, FragmentSource, Reference, VersionTag,
};
pub use model::{Node, NodeKind, TitleLevel};
pub use parser::{parse_html, HtmlEvents, StructuralEvent, StructuralExtractor};
pub use render::{rewrite_asset_links, to_html, HtmlRenderer, RenderOptions};

/// Resolve a fragment graph and render it to HTML in one step.
///
/// # Example
///
/// ```no_run
/// use fragmark::{resolve_to_html, Reference, RenderOptions};
///
/// # async fn demo(source: &dyn fragmark::FragmentSource) -> fragmark::Result<()> {
/// let options = RenderOptions::new().with_author_base_url("https://author.example.com");
/// let html = resolve_to_html(source, &Reference::new("/index"), &options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn resolve_to_html(
    source: &dyn FragmentSource,
    root: &Reference,
    options: &RenderOptions,
) -> Result<String> {
    let page = resolve(source, root).await?;
    to_html(&page, options)
}

/// Builder bundling render and build configuration.
///
/// # Example
///
/// ```
/// use fragmark::Transcoder;
///
/// let transcoder = Transcoder::new()
///     .with_author_base_url("https://author.example.com")
///     .with_title_prefix("demo");
/// let page = transcoder.parse("<main><div><p>Hello</p></div></main>");
/// let html = transcoder.render(&page)?;
/// # Ok::<(), fragmark::Error>(())
/// ```
pub struct Transcoder {
    render_options: RenderOptions,
    build_options: BuildOptions,
}

impl Transcoder {
    /// Create a new transcoder with default options.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
            build_options: BuildOptions::default(),
        }
    }

    /// Set the author base URL for asset links.
    pub fn with_author_base_url(mut self, url: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_author_base_url(url);
        self
    }

    /// Set the page path the root update targets.
    pub fn with_page_path(mut self, path: impl Into<String>) -> Self {
        self.build_options = self.build_options.with_page_path(path);
        self
    }

    /// Set the fragment title prefix.
    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.build_options = self.build_options.with_title_prefix(prefix);
        self
    }

    /// Set the container path for created fragments.
    pub fn with_parent_path(mut self, path: impl Into<String>) -> Self {
        self.build_options = self.build_options.with_parent_path(path);
        self
    }

    /// Parse rendered HTML into a page tree.
    pub fn parse(&self, html: &str) -> Node {
        parse_html(html)
    }

    /// Render a node tree to HTML.
    pub fn render(&self, node: &Node) -> Result<String> {
        to_html(node, &self.render_options)
    }

    /// Resolve a fragment graph into a node tree.
    pub async fn resolve(&self, source: &dyn FragmentSource, root: &Reference) -> Result<Node> {
        resolve(source, root).await
    }

    /// Resolve a fragment graph straight to HTML.
    pub async fn resolve_to_html(
        &self,
        source: &dyn FragmentSource,
        root: &Reference,
    ) -> Result<String> {
        resolve_to_html(source, root, &self.render_options).await
    }

    /// Write a page tree into the fragment graph.
    pub async fn build(&self, sink: &dyn FragmentSink, page: &Node) -> Result<Reference> {
        build_page(sink, page, &self.build_options).await
    }

    /// The render options in effect.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// The build options in effect.
    pub fn build_options(&self) -> &BuildOptions {
        &self.build_options
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}
