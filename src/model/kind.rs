//! Node kind discriminants and title levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fieldless discriminant for [`Node`](super::Node) variants.
///
/// Used for error reporting, builder dispatch, and the write capability
/// signature, where the variant matters but the payload does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Top-level page container.
    Page,
    /// Vertical page region.
    Section,
    /// Named block with rows.
    Block,
    /// One row inside a block.
    BlockRow,
    /// One column inside a block row.
    BlockColumn,
    /// Heading.
    Title,
    /// HTML-wrapped body text.
    Paragraph,
    /// Asset reference.
    Image,
}

impl NodeKind {
    /// Stable lowercase name, matching the interchange `type` tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Section => "section",
            NodeKind::Block => "block",
            NodeKind::BlockRow => "block-row",
            NodeKind::BlockColumn => "block-column",
            NodeKind::Title => "title",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Image => "image",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading level of a [`Title`](super::Node::Title) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleLevel {
    /// `<h1>`, the default when no level is recorded.
    #[default]
    H1,
    /// `<h2>`
    H2,
    /// `<h3>`
    H3,
    /// `<h4>`
    H4,
    /// `<h5>`
    H5,
    /// `<h6>`
    H6,
}

impl TitleLevel {
    /// The HTML tag name for this level (`"h1"` .. `"h6"`).
    pub fn tag(&self) -> &'static str {
        match self {
            TitleLevel::H1 => "h1",
            TitleLevel::H2 => "h2",
            TitleLevel::H3 => "h3",
            TitleLevel::H4 => "h4",
            TitleLevel::H5 => "h5",
            TitleLevel::H6 => "h6",
        }
    }

    /// Parse a heading tag name, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => Some(TitleLevel::H1),
            "h2" => Some(TitleLevel::H2),
            "h3" => Some(TitleLevel::H3),
            "h4" => Some(TitleLevel::H4),
            "h5" => Some(TitleLevel::H5),
            "h6" => Some(TitleLevel::H6),
            _ => None,
        }
    }
}

impl fmt::Display for TitleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TitleLevel {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_tag(s).ok_or(())
    }
}
