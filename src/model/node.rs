//! The canonical page tree.

use serde::{Deserialize, Serialize};

use super::{NodeKind, TitleLevel};

const NO_CHILDREN: &[Node] = &[];

/// One node in the canonical page tree.
///
/// The tree is a closed tagged union: every content kind the transcoder
/// understands is a variant here, and the renderer, resolver, and builder
/// all dispatch on it with exhaustive matches, so adding a kind is a
/// compile-checked change.
///
/// Containers hold plain `Vec<Node>` rather than per-variant child types.
/// The nesting grammar (a Page holds Sections, a Section holds Titles,
/// Paragraphs, Blocks, and Images, and so on) is deliberately not encoded
/// in the types: fragment graphs arrive from a remote system and can drift
/// from the schema, and a mis-nested child must stay representable so the
/// renderer can report it as [`Error::UnsupportedNodeKind`] instead of
/// failing to decode at all.
///
/// Child order is rendering order. Trees are built fresh per operation,
/// mutated only during construction, and never shared across operations.
///
/// [`Error::UnsupportedNodeKind`]: crate::Error::UnsupportedNodeKind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    /// Top-level page: an ordered run of sections.
    Page {
        /// Sections in rendering order.
        sections: Vec<Node>,
    },

    /// Vertical page region.
    Section {
        /// Titles, paragraphs, blocks, and images in rendering order.
        children: Vec<Node>,
    },

    /// Named block rendered as a classed `<div>` of rows.
    Block {
        /// Block name, emitted as the `class` attribute.
        name: String,
        /// Rows in rendering order.
        rows: Vec<Node>,
    },

    /// One row inside a block.
    BlockRow {
        /// Columns in rendering order.
        columns: Vec<Node>,
    },

    /// One column inside a block row; the text is a raw HTML fragment.
    BlockColumn {
        /// Trimmed column body, empty until a text event arrives.
        text: String,
    },

    /// Heading with an explicit level.
    Title {
        /// Trimmed heading text.
        text: String,
        /// Heading level, `h1` when never specified.
        #[serde(default)]
        level: TitleLevel,
    },

    /// Body text, stored pre-wrapped in its own `<p>` tags.
    Paragraph {
        /// The wrapped HTML, e.g. `<p>Body</p>`.
        text: String,
    },

    /// Reference to a binary asset; the bytes themselves never pass
    /// through this crate.
    Image {
        /// Asset path, e.g. `/content/dam/site/hero.png`.
        path: String,
    },
}

impl Node {
    /// Create a page from its sections.
    pub fn page(sections: Vec<Node>) -> Self {
        Node::Page { sections }
    }

    /// Create a section from its children.
    pub fn section(children: Vec<Node>) -> Self {
        Node::Section { children }
    }

    /// Create a named block from its rows.
    pub fn block(name: impl Into<String>, rows: Vec<Node>) -> Self {
        Node::Block {
            name: name.into(),
            rows,
        }
    }

    /// Create a block row from its columns.
    pub fn row(columns: Vec<Node>) -> Self {
        Node::BlockRow { columns }
    }

    /// Create a block column from its raw HTML body.
    pub fn column(text: impl Into<String>) -> Self {
        Node::BlockColumn { text: text.into() }
    }

    /// Create a title.
    pub fn title(text: impl Into<String>, level: TitleLevel) -> Self {
        Node::Title {
            text: text.into(),
            level,
        }
    }

    /// Create a paragraph from already-wrapped HTML.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph { text: text.into() }
    }

    /// Create an image reference.
    pub fn image(path: impl Into<String>) -> Self {
        Node::Image { path: path.into() }
    }

    /// The discriminant for this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Page { .. } => NodeKind::Page,
            Node::Section { .. } => NodeKind::Section,
            Node::Block { .. } => NodeKind::Block,
            Node::BlockRow { .. } => NodeKind::BlockRow,
            Node::BlockColumn { .. } => NodeKind::BlockColumn,
            Node::Title { .. } => NodeKind::Title,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Image { .. } => NodeKind::Image,
        }
    }

    /// Children of this node, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Page { sections } => sections,
            Node::Section { children } => children,
            Node::Block { rows, .. } => rows,
            Node::BlockRow { columns } => columns,
            _ => NO_CHILDREN,
        }
    }

    /// True for the container variants (Page, Section, Block, BlockRow).
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Node::Page { .. } | Node::Section { .. } | Node::Block { .. } | Node::BlockRow { .. }
        )
    }

    /// Total number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }
}
