//! Positional grammar over structural events.
//!
//! Only position in the tree decides what an element means. Relative to the
//! nearest `<main>`: a `div` one level down opens a [`Node::Section`], an
//! `h1`..`h6` or `p` two levels down opens a [`Node::Title`] or
//! [`Node::Paragraph`], a `div` with a `class` attribute two levels down
//! opens a [`Node::Block`], plain `div`s three and four levels down open a
//! [`Node::BlockRow`] and [`Node::BlockColumn`]. Everything else passes
//! through untouched, so arbitrary page chrome around the `<main>` region is
//! harmless.

use crate::model::{Node, TitleLevel};
use crate::parser::events::{HtmlEvents, StructuralEvent};

/// Streaming extractor from structural events to a [`Node::Page`].
///
/// Never fails. Unmatched elements are skipped, unclosed elements are closed
/// when a sibling or ancestor supersedes them, stray close tags are dropped,
/// and an open `p` closes when a block-level element opens, as in serialized
/// HTML. One partially built node is held per grammar level; a node is
/// attached to its parent the moment it closes, so the tree is complete by
/// [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct StructuralExtractor {
    /// Open element names from the document root down.
    stack: Vec<String>,
    /// Stack index of the `<main>` we are inside, if any.
    main: Option<usize>,
    /// Completed sections, in document order.
    sections: Vec<Node>,
    /// Children of the section currently open.
    section: Option<Vec<Node>>,
    /// Title, paragraph or block currently open under the section.
    leaf: Option<Node>,
    /// Columns of the row currently open under a block.
    row: Option<Vec<Node>>,
    /// Text of the column currently open under a row.
    column: Option<String>,
}

impl StructuralExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event.
    pub fn handle(&mut self, event: StructuralEvent) {
        match event {
            StructuralEvent::Enter { tag, attributes } => self.enter(tag, &attributes),
            StructuralEvent::Text(content) => self.text(&content),
            StructuralEvent::Leave { tag } => self.leave(&tag),
        }
    }

    /// Close whatever is still open and return the assembled page.
    pub fn finish(mut self) -> Node {
        self.close_section();
        Node::page(self.sections)
    }

    fn enter(&mut self, tag: String, attributes: &[(String, String)]) {
        // A block-level opener implicitly ends an open paragraph.
        if self.stack.last().map(String::as_str) == Some("p") && closes_paragraph(&tag) {
            self.leave("p");
        }

        if self.main.is_none() && tag == "main" {
            self.main = Some(self.stack.len());
            self.stack.push(tag);
            return;
        }

        if let Some(main) = self.main {
            // Depth below the open <main>; its direct children sit at 1.
            let level = self.stack.len() - main;
            match level {
                1 => {
                    if tag == "div" {
                        self.close_section();
                        self.section = Some(Vec::new());
                    }
                }
                2 => {
                    if self.section.is_some() {
                        if let Some(title_level) = TitleLevel::from_tag(&tag) {
                            self.close_leaf();
                            self.leaf = Some(Node::Title {
                                text: String::new(),
                                level: title_level,
                            });
                        } else if tag == "p" {
                            self.close_leaf();
                            self.leaf = Some(Node::Paragraph {
                                text: String::new(),
                            });
                        } else if tag == "div" {
                            let class = attributes
                                .iter()
                                .find(|(key, _)| key == "class")
                                .map(|(_, value)| value.clone());
                            if let Some(name) = class {
                                self.close_leaf();
                                self.leaf = Some(Node::Block {
                                    name,
                                    rows: Vec::new(),
                                });
                            }
                        }
                    }
                }
                3 => {
                    let in_block = matches!(self.leaf, Some(Node::Block { .. }));
                    if in_block && tag == "div" {
                        self.close_row();
                        self.row = Some(Vec::new());
                    }
                }
                4 => {
                    if self.row.is_some() && tag == "div" {
                        self.close_column();
                        self.column = Some(String::new());
                    }
                }
                _ => {}
            }
        }

        self.stack.push(tag);
    }

    fn text(&mut self, content: &str) {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }

        // Deepest open cursor with a text field wins. A later run under the
        // same node replaces the earlier one.
        if let Some(column) = &mut self.column {
            if !column.is_empty() {
                log::debug!("column text replaced: {column:?} -> {trimmed:?}");
            }
            *column = trimmed.to_string();
        } else {
            match &mut self.leaf {
                Some(Node::Title { text, .. }) => {
                    if !text.is_empty() {
                        log::debug!("title text replaced: {text:?} -> {trimmed:?}");
                    }
                    *text = trimmed.to_string();
                }
                Some(Node::Paragraph { text }) => {
                    if !text.is_empty() {
                        log::debug!("paragraph text replaced: {text:?} -> {trimmed:?}");
                    }
                    *text = format!("<p>{trimmed}</p>");
                }
                _ => {}
            }
        }
    }

    fn leave(&mut self, tag: &str) {
        let Some(position) = self.stack.iter().rposition(|open| open == tag) else {
            return;
        };

        if let Some(main) = self.main {
            if position <= main {
                // The <main> itself (or an ancestor of it) closed.
                self.close_section();
                self.main = None;
            } else {
                match position - main {
                    1 => self.close_section(),
                    2 => self.close_leaf(),
                    3 => self.close_row(),
                    4 => self.close_column(),
                    _ => {}
                }
            }
        }

        self.stack.truncate(position);
    }

    fn close_column(&mut self) {
        if let Some(text) = self.column.take() {
            if let Some(columns) = &mut self.row {
                columns.push(Node::column(text));
            }
        }
    }

    fn close_row(&mut self) {
        self.close_column();
        if let Some(columns) = self.row.take() {
            if let Some(Node::Block { rows, .. }) = &mut self.leaf {
                rows.push(Node::row(columns));
            }
        }
    }

    fn close_leaf(&mut self) {
        self.close_row();
        if let Some(node) = self.leaf.take() {
            if let Some(children) = &mut self.section {
                children.push(node);
            }
        }
    }

    fn close_section(&mut self) {
        self.close_leaf();
        if let Some(children) = self.section.take() {
            self.sections.push(Node::section(children));
        }
    }
}

/// Openers that implicitly close a `<p>` still open in the markup.
fn closes_paragraph(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "fieldset"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "ul"
    )
}

/// Parse rendered HTML into a [`Node::Page`].
///
/// Total over its input: markup that matches nothing yields a page with no
/// sections rather than an error.
pub fn parse_html(html: &str) -> Node {
    let mut extractor = StructuralExtractor::new();
    for event in HtmlEvents::new(html) {
        extractor.handle(event);
    }
    extractor.finish()
}

/// Assemble a page from an already-extracted event sequence.
pub fn parse_events(events: impl IntoIterator<Item = StructuralEvent>) -> Node {
    let mut extractor = StructuralExtractor::new();
    for event in events {
        extractor.handle(event);
    }
    extractor.finish()
}
