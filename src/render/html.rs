//! HTML rendering for node trees.

use crate::error::{Error, Result};
use crate::model::Node;

use super::{rewrite_asset_links, RenderOptions};

/// Convert a node tree to HTML.
pub fn to_html(node: &Node, options: &RenderOptions) -> Result<String> {
    let renderer = HtmlRenderer::new(options.clone());
    renderer.render(node)
}

/// HTML renderer.
///
/// Emission is exact: no whitespace is inserted between elements, so output
/// compares byte-for-byte and feeds straight back into the parser.
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a node and its descendants.
    ///
    /// A page renders as a full body shell around its sections; any other
    /// node renders as just its own fragment. A child of a kind its
    /// container cannot hold fails with [`Error::UnsupportedNodeKind`].
    pub fn render(&self, node: &Node) -> Result<String> {
        let mut output = String::new();
        self.render_node(&mut output, node)?;
        Ok(output)
    }

    fn render_node(&self, output: &mut String, node: &Node) -> Result<()> {
        match node {
            Node::Page { sections } => self.render_page(output, sections),
            Node::Section { children } => self.render_section(output, children),
            Node::Block { name, rows } => self.render_block(output, name, rows),
            Node::BlockRow { columns } => self.render_row(output, columns),
            Node::BlockColumn { text } => {
                output.push_str("<div>");
                output.push_str(&self.rewrite(text));
                output.push_str("</div>");
                Ok(())
            }
            Node::Title { text, level } => {
                let tag = level.tag();
                output.push('<');
                output.push_str(tag);
                output.push('>');
                output.push_str(text);
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
                Ok(())
            }
            Node::Paragraph { text } => {
                // Stored pre-wrapped; emitted verbatim apart from asset links.
                output.push_str(&self.rewrite(text));
                Ok(())
            }
            Node::Image { path } => {
                output.push_str("<img src=\"");
                output.push_str(&self.options.author_base_url);
                output.push_str(path);
                output.push_str("\">");
                Ok(())
            }
        }
    }

    fn render_page(&self, output: &mut String, sections: &[Node]) -> Result<()> {
        output.push_str("<body><header></header><main>");
        for section in sections {
            match section {
                Node::Section { .. } => self.render_node(output, section)?,
                other => {
                    return Err(Error::UnsupportedNodeKind {
                        kind: other.kind(),
                        context: "page sections",
                    })
                }
            }
        }
        output.push_str("</main><footer></footer></body>");
        Ok(())
    }

    fn render_section(&self, output: &mut String, children: &[Node]) -> Result<()> {
        output.push_str("<div>");
        for child in children {
            match child {
                Node::Title { .. }
                | Node::Paragraph { .. }
                | Node::Block { .. }
                | Node::Image { .. } => self.render_node(output, child)?,
                other => {
                    return Err(Error::UnsupportedNodeKind {
                        kind: other.kind(),
                        context: "section children",
                    })
                }
            }
        }
        output.push_str("</div>");
        Ok(())
    }

    fn render_block(&self, output: &mut String, name: &str, rows: &[Node]) -> Result<()> {
        output.push_str("<div class=\"");
        output.push_str(name);
        output.push_str("\">");
        for row in rows {
            match row {
                Node::BlockRow { .. } => self.render_node(output, row)?,
                other => {
                    return Err(Error::UnsupportedNodeKind {
                        kind: other.kind(),
                        context: "block rows",
                    })
                }
            }
        }
        output.push_str("</div>");
        Ok(())
    }

    fn render_row(&self, output: &mut String, columns: &[Node]) -> Result<()> {
        output.push_str("<div>");
        for column in columns {
            match column {
                Node::BlockColumn { .. } => self.render_node(output, column)?,
                other => {
                    return Err(Error::UnsupportedNodeKind {
                        kind: other.kind(),
                        context: "row columns",
                    })
                }
            }
        }
        output.push_str("</div>");
        Ok(())
    }

    fn rewrite(&self, html: &str) -> String {
        rewrite_asset_links(html, &self.options.author_base_url)
    }
}
