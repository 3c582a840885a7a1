//! Fragment graph resolution.
//!
//! Walks reference links from a root record down to the leaves and rebuilds
//! the node tree. Each container fans out one dereference per child and
//! joins fail-fast, so latency grows with tree depth rather than node count,
//! and the first failing branch aborts the whole resolve. Completion order
//! is unordered; reassembly preserves reference order. Nothing is cached or
//! deduplicated, so total fetch count equals node count.

use futures::future::{try_join_all, BoxFuture};

use crate::error::{Error, Result};
use crate::fragment::capability::FragmentSource;
use crate::fragment::record::FragmentRecord;
use crate::fragment::reference::Reference;
use crate::fragment::schema::elements;
use crate::model::{Node, NodeKind, TitleLevel};

/// Resolve the graph rooted at a reference into a node tree.
pub async fn resolve(source: &dyn FragmentSource, root: &Reference) -> Result<Node> {
    let record = source.dereference(root).await?;
    resolve_record(source, record).await
}

/// Resolve an already-fetched record and everything below it.
///
/// Dispatch is on the record's model identifier; an unrecognized one is
/// [`Error::UnknownModel`], a record missing a required element is
/// [`Error::MalformedRecord`]. Boxed because container arms recurse through
/// their children.
pub fn resolve_record<'a>(
    source: &'a dyn FragmentSource,
    record: FragmentRecord,
) -> BoxFuture<'a, Result<Node>> {
    Box::pin(async move {
        match record.kind()? {
            NodeKind::Page => {
                let sections = resolve_children(source, &record, elements::SECTIONS).await?;
                Ok(Node::page(sections))
            }
            NodeKind::Section => {
                let children = resolve_children(source, &record, elements::CHILDREN).await?;
                Ok(Node::section(children))
            }
            NodeKind::Block => {
                let name = record.require_text(elements::BLOCK_NAME)?.to_string();
                let rows = resolve_children(source, &record, elements::ROWS).await?;
                Ok(Node::block(name, rows))
            }
            NodeKind::BlockRow => {
                // Column bodies are stored inline on the row.
                let columns = record
                    .values(elements::COLUMNS)
                    .into_iter()
                    .map(Node::column)
                    .collect();
                Ok(Node::row(columns))
            }
            NodeKind::Title => {
                let text = record.require_text(elements::TITLE)?.to_string();
                let level = record
                    .text(elements::TITLE_LEVEL)
                    .and_then(TitleLevel::from_tag)
                    .unwrap_or_default();
                Ok(Node::title(text, level))
            }
            NodeKind::Paragraph => {
                Ok(Node::paragraph(record.require_text(elements::PARAGRAPH)?))
            }
            NodeKind::Image => Ok(Node::image(record.require_text(elements::IMAGE)?)),
            // No fragment model maps to a block column.
            NodeKind::BlockColumn => {
                Err(Error::UnknownModel(record.properties.model.path.clone()))
            }
        }
    })
}

async fn resolve_children(
    source: &dyn FragmentSource,
    record: &FragmentRecord,
    element: &'static str,
) -> Result<Vec<Node>> {
    let references = record.values(element);
    log::debug!(
        "resolving {} '{element}' children of {}",
        references.len(),
        record.path
    );
    try_join_all(
        references
            .into_iter()
            .map(|reference| resolve_child(source, Reference::new(reference))),
    )
    .await
}

async fn resolve_child(source: &dyn FragmentSource, reference: Reference) -> Result<Node> {
    let record = source.dereference(&reference).await?;
    resolve_record(source, record).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::schema;

    /// Source for records whose subtree needs no fetching.
    struct NoFetch;

    #[async_trait::async_trait]
    impl FragmentSource for NoFetch {
        async fn dereference(&self, reference: &Reference) -> Result<FragmentRecord> {
            Err(Error::NotFound(reference.to_string()))
        }
    }

    #[tokio::test]
    async fn test_title_record_decodes() {
        let record = FragmentRecord::new("/content/t", schema::TITLE_MODEL)
            .with_text(elements::TITLE, "Hi")
            .with_text(elements::TITLE_LEVEL, "h3");
        let node = resolve_record(&NoFetch, record).await.unwrap();
        assert_eq!(node, Node::title("Hi", TitleLevel::H3));
    }

    #[tokio::test]
    async fn test_title_level_defaults_to_h1() {
        let record =
            FragmentRecord::new("/content/t", schema::TITLE_MODEL).with_text(elements::TITLE, "Hi");
        let node = resolve_record(&NoFetch, record).await.unwrap();
        assert_eq!(node, Node::title("Hi", TitleLevel::H1));
    }

    #[tokio::test]
    async fn test_row_columns_decode_inline() {
        let record = FragmentRecord::new("/content/r", schema::BLOCK_ROW_MODEL)
            .with_values(elements::COLUMNS, vec!["a".to_string(), "b".to_string()]);
        let node = resolve_record(&NoFetch, record).await.unwrap();
        assert_eq!(node, Node::row(vec![Node::column("a"), Node::column("b")]));
    }

    #[tokio::test]
    async fn test_malformed_paragraph() {
        let record = FragmentRecord::new("/content/p", schema::PARAGRAPH_MODEL);
        let err = resolve_record(&NoFetch, record).await.unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[tokio::test]
    async fn test_unknown_model_surfaces() {
        let record = FragmentRecord::new("/content/x", "/conf/other/models/widget");
        let err = resolve_record(&NoFetch, record).await.unwrap_err();
        assert!(matches!(err, Error::UnknownModel(path) if path.contains("widget")));
    }

    #[tokio::test]
    async fn test_missing_child_aborts() {
        let record = FragmentRecord::new("/content/s", schema::SECTION_MODEL)
            .with_values(elements::CHILDREN, vec!["/content/gone".to_string()]);
        let err = resolve_record(&NoFetch, record).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(path) if path == "/content/gone"));
    }
}
