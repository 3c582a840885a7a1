//! Bottom-up fragment graph construction.
//!
//! A node is written only after every one of its children has been written
//! and returned a reference, because the parent payload embeds those
//! references. Children of one container are written concurrently with a
//! fail-fast join: one failing child aborts the parent before its write
//! starts. Nothing is retried and partially written subtrees are not rolled
//! back; the caller decides what to do with the surfaced error.

use futures::future::{try_join_all, BoxFuture};
use rand::Rng;

use crate::error::{Error, Result};
use crate::fragment::capability::FragmentSink;
use crate::fragment::payload::{FieldPayload, FragmentPayload};
use crate::fragment::reference::Reference;
use crate::fragment::schema::{self, elements};
use crate::model::{Node, NodeKind};

/// Options controlling fragment creation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Path identifying the page whose root record gets updated.
    pub page_path: String,
    /// Prefix for generated fragment titles.
    pub title_prefix: String,
    /// Repository container new fragments are created under.
    pub parent_path: String,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page path the root update targets.
    pub fn with_page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = path.into();
        self
    }

    /// Set the fragment title prefix.
    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    /// Set the container path for created fragments.
    pub fn with_parent_path(mut self, path: impl Into<String>) -> Self {
        self.parent_path = path.into();
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            page_path: "/index".to_string(),
            title_prefix: "page".to_string(),
            parent_path: "/content/fragments".to_string(),
        }
    }
}

/// Write a page tree into the fragment graph, bottom-up.
///
/// All sections (and everything below them) are created first; the root is
/// then updated in place through the conditional sequence: look up the
/// record for `page_path`, fetch its version tag, and update against that
/// tag. A tag gone stale between fetch and update surfaces as
/// [`Error::VersionConflict`] with remote state unchanged.
pub async fn build_page(
    sink: &dyn FragmentSink,
    page: &Node,
    options: &BuildOptions,
) -> Result<Reference> {
    let Node::Page { sections } = page else {
        return Err(Error::UnsupportedNodeKind {
            kind: page.kind(),
            context: "build root",
        });
    };

    let references = build_children(sink, sections, options).await?;
    let payload = FragmentPayload::new(
        fragment_title(options, NodeKind::Page),
        schema::PAGE_MODEL,
        &options.parent_path,
    )
    .with_field(FieldPayload::references(elements::SECTIONS, &references));

    let root = sink.lookup(&options.page_path).await?;
    let tag = sink.version_tag(&root).await?;
    log::debug!("updating root {root} against tag {tag}");
    sink.update_root(&root, payload, &tag).await
}

fn build_node<'a>(
    sink: &'a dyn FragmentSink,
    node: &'a Node,
    options: &'a BuildOptions,
) -> BoxFuture<'a, Result<Reference>> {
    Box::pin(async move {
        match node {
            Node::Section { children } => {
                let references = build_children(sink, children, options).await?;
                let fields = vec![FieldPayload::references(elements::CHILDREN, &references)];
                write_fragment(sink, NodeKind::Section, schema::SECTION_MODEL, options, fields)
                    .await
            }
            Node::Block { name, rows } => {
                let references = build_children(sink, rows, options).await?;
                let fields = vec![
                    FieldPayload::text(elements::BLOCK_NAME, name).with_multiple(false),
                    FieldPayload::references(elements::ROWS, &references),
                ];
                write_fragment(sink, NodeKind::Block, schema::BLOCK_MODEL, options, fields).await
            }
            Node::BlockRow { columns } => {
                let texts = columns
                    .iter()
                    .map(|column| match column {
                        Node::BlockColumn { text } => Ok(text.clone()),
                        other => Err(Error::UnsupportedNodeKind {
                            kind: other.kind(),
                            context: "row columns",
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                let fields = vec![FieldPayload::long_text_values(elements::COLUMNS, texts)];
                write_fragment(sink, NodeKind::BlockRow, schema::BLOCK_ROW_MODEL, options, fields)
                    .await
            }
            Node::Title { text, level } => {
                let fields = vec![
                    FieldPayload::text(elements::TITLE, text),
                    FieldPayload::enumeration(elements::TITLE_LEVEL, level.tag()),
                ];
                write_fragment(sink, NodeKind::Title, schema::TITLE_MODEL, options, fields).await
            }
            Node::Paragraph { text } => {
                let fields = vec![FieldPayload::long_text(elements::PARAGRAPH, text)];
                write_fragment(sink, NodeKind::Paragraph, schema::PARAGRAPH_MODEL, options, fields)
                    .await
            }
            // Asset upload is the passthrough collaborator's concern; the
            // path already is the reference.
            Node::Image { path } => Ok(Reference::new(path.clone())),
            Node::Page { .. } | Node::BlockColumn { .. } => Err(Error::UnsupportedNodeKind {
                kind: node.kind(),
                context: "child fragments",
            }),
        }
    })
}

async fn build_children(
    sink: &dyn FragmentSink,
    children: &[Node],
    options: &BuildOptions,
) -> Result<Vec<Reference>> {
    log::debug!("building {} child fragments", children.len());
    try_join_all(children.iter().map(|child| build_node(sink, child, options))).await
}

async fn write_fragment(
    sink: &dyn FragmentSink,
    kind: NodeKind,
    model_path: &str,
    options: &BuildOptions,
    fields: Vec<FieldPayload>,
) -> Result<Reference> {
    let mut payload = FragmentPayload::new(
        fragment_title(options, kind),
        model_path,
        &options.parent_path,
    );
    for field in fields {
        payload = payload.with_field(field);
    }
    log::debug!("writing {kind} fragment '{}'", payload.title);
    sink.write(kind, payload).await
}

fn fragment_title(options: &BuildOptions, kind: NodeKind) -> String {
    let mut rng = rand::rng();
    let suffix: u32 = rng.random();
    format!("{}-{}-{suffix}", options.title_prefix, kind)
}
