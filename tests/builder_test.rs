//! Integration tests for fragment graph construction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fragmark::fragment::schema::{self, elements};
use fragmark::{
    build_page, BuildOptions, Error, FieldType, FragmentPayload, FragmentSink, Node, NodeKind,
    Reference, Result, TitleLevel, VersionTag,
};

/// Sink that records every call and hands out sequential references.
struct RecordingSink {
    calls: Mutex<Vec<Call>>,
    counter: AtomicUsize,
    fail_on: Option<NodeKind>,
    conflict: bool,
}

#[derive(Debug, Clone)]
enum Call {
    Write {
        kind: NodeKind,
        payload: FragmentPayload,
        reference: String,
    },
    Lookup {
        page_path: String,
    },
    VersionTag {
        reference: String,
    },
    UpdateRoot {
        reference: String,
        payload: FragmentPayload,
        expected: String,
    },
}

const ROOT: &str = "/content/root";
const TAG: &str = "7";

impl RecordingSink {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
            fail_on: None,
            conflict: false,
        }
    }

    fn failing_on(kind: NodeKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::new()
        }
    }

    fn conflicting() -> Self {
        Self {
            conflict: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded write for a node kind, with the reference it returned.
    fn write_of(&self, kind: NodeKind) -> (FragmentPayload, String) {
        self.calls()
            .iter()
            .find_map(|call| match call {
                Call::Write {
                    kind: k,
                    payload,
                    reference,
                } if *k == kind => Some((payload.clone(), reference.clone())),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no {kind} write recorded"))
    }

    fn write_index(&self, kind: NodeKind) -> usize {
        self.calls()
            .iter()
            .position(|call| matches!(call, Call::Write { kind: k, .. } if *k == kind))
            .unwrap_or_else(|| panic!("no {kind} write recorded"))
    }
}

#[async_trait::async_trait]
impl FragmentSink for RecordingSink {
    async fn write(&self, kind: NodeKind, payload: FragmentPayload) -> Result<Reference> {
        if self.fail_on == Some(kind) {
            return Err(Error::RejectedPayload {
                kind,
                detail: "refused by test sink".to_string(),
            });
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let reference = format!("/content/dam/fragments/n{n}");
        self.calls.lock().unwrap().push(Call::Write {
            kind,
            payload,
            reference: reference.clone(),
        });
        Ok(Reference::new(reference))
    }

    async fn lookup(&self, page_path: &str) -> Result<Reference> {
        self.calls.lock().unwrap().push(Call::Lookup {
            page_path: page_path.to_string(),
        });
        Ok(Reference::new(ROOT))
    }

    async fn version_tag(&self, reference: &Reference) -> Result<VersionTag> {
        self.calls.lock().unwrap().push(Call::VersionTag {
            reference: reference.to_string(),
        });
        Ok(VersionTag::new(TAG))
    }

    async fn update_root(
        &self,
        reference: &Reference,
        payload: FragmentPayload,
        expected: &VersionTag,
    ) -> Result<Reference> {
        if self.conflict {
            return Err(Error::VersionConflict {
                reference: reference.to_string(),
                expected: expected.to_string(),
            });
        }
        self.calls.lock().unwrap().push(Call::UpdateRoot {
            reference: reference.to_string(),
            payload,
            expected: expected.to_string(),
        });
        Ok(reference.clone())
    }
}

fn scenario_page() -> Node {
    Node::page(vec![
        Node::section(vec![
            Node::title("Welcome", TitleLevel::H2),
            Node::paragraph("<p>Intro</p>"),
        ]),
        Node::section(vec![
            Node::block(
                "columns",
                vec![Node::row(vec![
                    Node::column("<p>left</p>"),
                    Node::column("<p>right</p>"),
                ])],
            ),
            Node::image("/content/dam/site/hero.png"),
        ]),
    ])
}

fn options() -> BuildOptions {
    BuildOptions::new().with_page_path("/site/home")
}

#[tokio::test]
async fn test_build_returns_updated_root() {
    let sink = RecordingSink::new();
    let root = build_page(&sink, &scenario_page(), &options()).await.unwrap();
    assert_eq!(root, Reference::new(ROOT));
}

#[tokio::test]
async fn test_children_written_before_parents() {
    let sink = RecordingSink::new();
    build_page(&sink, &scenario_page(), &options()).await.unwrap();

    let section_indexes: Vec<usize> = sink
        .calls()
        .iter()
        .enumerate()
        .filter_map(|(index, call)| {
            matches!(call, Call::Write { kind: NodeKind::Section, .. }).then_some(index)
        })
        .collect();
    assert_eq!(section_indexes.len(), 2);

    assert!(sink.write_index(NodeKind::Title) < section_indexes[0]);
    assert!(sink.write_index(NodeKind::Paragraph) < section_indexes[0]);
    assert!(sink.write_index(NodeKind::BlockRow) < sink.write_index(NodeKind::Block));
    assert!(sink.write_index(NodeKind::Block) < section_indexes[1]);

    // Every write happens before the root sequence starts.
    let calls = sink.calls();
    let lookup = calls
        .iter()
        .position(|call| matches!(call, Call::Lookup { .. }))
        .unwrap();
    for (index, call) in calls.iter().enumerate() {
        if matches!(call, Call::Write { .. }) {
            assert!(index < lookup);
        }
    }
}

#[tokio::test]
async fn test_parents_embed_child_references_in_order() {
    let sink = RecordingSink::new();
    build_page(&sink, &scenario_page(), &options()).await.unwrap();

    let (block_payload, block_ref) = sink.write_of(NodeKind::Block);
    let (_, row_ref) = sink.write_of(NodeKind::BlockRow);
    assert_eq!(
        block_payload.field(elements::ROWS).unwrap().values,
        vec![row_ref]
    );

    let (title_payload, title_ref) = sink.write_of(NodeKind::Title);
    assert_eq!(
        title_payload.field(elements::TITLE).unwrap().values,
        vec!["Welcome".to_string()]
    );
    assert_eq!(
        title_payload.field(elements::TITLE_LEVEL).unwrap().values,
        vec!["h2".to_string()]
    );

    let (_, paragraph_ref) = sink.write_of(NodeKind::Paragraph);

    // Two section writes; the second embeds the block and the untouched
    // image path.
    let sections: Vec<(FragmentPayload, String)> = sink
        .calls()
        .iter()
        .filter_map(|call| match call {
            Call::Write {
                kind: NodeKind::Section,
                payload,
                reference,
            } => Some((payload.clone(), reference.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(sections.len(), 2);
    assert_eq!(
        sections[0].0.field(elements::CHILDREN).unwrap().values,
        vec![title_ref, paragraph_ref]
    );
    assert_eq!(
        sections[1].0.field(elements::CHILDREN).unwrap().values,
        vec![block_ref, "/content/dam/site/hero.png".to_string()]
    );

    let root_payload = sink
        .calls()
        .iter()
        .find_map(|call| match call {
            Call::UpdateRoot { payload, .. } => Some(payload.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        root_payload.field(elements::SECTIONS).unwrap().values,
        vec![sections[0].1.clone(), sections[1].1.clone()]
    );
}

#[tokio::test]
async fn test_row_inlines_column_bodies() {
    let sink = RecordingSink::new();
    build_page(&sink, &scenario_page(), &options()).await.unwrap();

    let (row_payload, _) = sink.write_of(NodeKind::BlockRow);
    let columns = row_payload.field(elements::COLUMNS).unwrap();
    assert_eq!(columns.field_type, FieldType::LongText);
    assert_eq!(columns.multiple, Some(true));
    assert_eq!(
        columns.values,
        vec!["<p>left</p>".to_string(), "<p>right</p>".to_string()]
    );
}

#[tokio::test]
async fn test_payload_wire_details() {
    let sink = RecordingSink::new();
    build_page(
        &sink,
        &scenario_page(),
        &options().with_title_prefix("demo").with_parent_path("/content/demo"),
    )
    .await
    .unwrap();

    let (block_payload, _) = sink.write_of(NodeKind::Block);
    assert!(block_payload.title.starts_with("demo-block-"));
    assert_eq!(block_payload.parent_path, "/content/demo");
    assert_eq!(
        block_payload.model_id,
        schema::encode_model_id(schema::BLOCK_MODEL)
    );
    let name = block_payload.field(elements::BLOCK_NAME).unwrap();
    assert_eq!(name.field_type, FieldType::Text);
    assert_eq!(name.multiple, Some(false));

    let (paragraph_payload, _) = sink.write_of(NodeKind::Paragraph);
    let body = paragraph_payload.field(elements::PARAGRAPH).unwrap();
    assert_eq!(body.field_type, FieldType::LongText);
    assert_eq!(body.mime_type.as_deref(), Some("text/html"));
    assert_eq!(body.multiple, None);
}

#[tokio::test]
async fn test_image_is_never_written() {
    let sink = RecordingSink::new();
    build_page(&sink, &scenario_page(), &options()).await.unwrap();

    assert!(!sink
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Write { kind: NodeKind::Image, .. })));
}

#[tokio::test]
async fn test_root_sequence_is_lookup_tag_update() {
    let sink = RecordingSink::new();
    build_page(&sink, &scenario_page(), &options()).await.unwrap();

    let calls = sink.calls();
    let tail = &calls[calls.len() - 3..];
    assert!(matches!(&tail[0], Call::Lookup { page_path } if page_path == "/site/home"));
    assert!(matches!(&tail[1], Call::VersionTag { reference } if reference == ROOT));
    assert!(
        matches!(&tail[2], Call::UpdateRoot { reference, expected, .. }
            if reference == ROOT && expected == TAG)
    );
}

#[tokio::test]
async fn test_version_conflict_propagates() {
    let sink = RecordingSink::conflicting();
    let err = build_page(&sink, &scenario_page(), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::VersionConflict { reference, .. } if reference == ROOT));
}

#[tokio::test]
async fn test_failed_child_aborts_parent_write() {
    let sink = RecordingSink::failing_on(NodeKind::Paragraph);
    let err = build_page(&sink, &scenario_page(), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RejectedPayload { kind: NodeKind::Paragraph, .. }));

    // The section above the failed paragraph never gets written, and the
    // root sequence never starts.
    let calls = sink.calls();
    assert!(!calls
        .iter()
        .any(|call| matches!(call, Call::Write { kind: NodeKind::Section, .. })));
    assert!(!calls.iter().any(|call| matches!(call, Call::Lookup { .. })));
}

#[tokio::test]
async fn test_non_page_root_is_rejected() {
    let sink = RecordingSink::new();
    let err = build_page(&sink, &Node::section(vec![]), &options())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedNodeKind {
            kind: NodeKind::Section,
            context: "build root",
        }
    ));
    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_stray_column_outside_row_is_rejected() {
    let page = Node::page(vec![Node::section(vec![Node::column("loose")])]);
    let sink = RecordingSink::new();
    let err = build_page(&sink, &page, &options()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedNodeKind {
            kind: NodeKind::BlockColumn,
            ..
        }
    ));
}

#[tokio::test]
async fn test_row_rejects_non_column_children() {
    let page = Node::page(vec![Node::section(vec![Node::block(
        "columns",
        vec![Node::row(vec![Node::title("nope", TitleLevel::H1)])],
    )])]);
    let sink = RecordingSink::new();
    let err = build_page(&sink, &page, &options()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedNodeKind {
            kind: NodeKind::Title,
            context: "row columns",
        }
    ));
}
