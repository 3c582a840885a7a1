//! The external fragment schema: model identifiers and field names.
//!
//! One node kind maps to one model path, except block columns, which are
//! stored inline in their row's `columns` element and have no model of their
//! own. Write payloads carry the base64 encoding of the model path as their
//! `modelId`; read records carry the path itself.

use base64::Engine;

use crate::error::{Error, Result};
use crate::model::NodeKind;

/// Root path all fragment models live under.
pub const MODEL_ROOT: &str = "/conf/global/settings/dam/cfm/models";

pub const PAGE_MODEL: &str = "/conf/global/settings/dam/cfm/models/page";
pub const SECTION_MODEL: &str = "/conf/global/settings/dam/cfm/models/section";
pub const TITLE_MODEL: &str = "/conf/global/settings/dam/cfm/models/title";
pub const PARAGRAPH_MODEL: &str = "/conf/global/settings/dam/cfm/models/paragraph";
pub const BLOCK_MODEL: &str = "/conf/global/settings/dam/cfm/models/block";
pub const BLOCK_ROW_MODEL: &str = "/conf/global/settings/dam/cfm/models/block-row";
pub const IMAGE_MODEL: &str = "/conf/global/settings/dam/cfm/models/image";

/// MIME type declared on HTML-carrying long-text fields.
pub const MIME_HTML: &str = "text/html";

/// Element names fixed by the fragment models.
pub mod elements {
    pub const SECTIONS: &str = "sections";
    pub const CHILDREN: &str = "children";
    pub const TITLE: &str = "title";
    pub const TITLE_LEVEL: &str = "titleLevel";
    pub const PARAGRAPH: &str = "paragraph";
    pub const BLOCK_NAME: &str = "blockName";
    pub const ROWS: &str = "rows";
    pub const COLUMNS: &str = "columns";
    pub const IMAGE: &str = "image";
}

/// Model path for a node kind, `None` for kinds not stored as fragments.
pub fn model_path(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Page => Some(PAGE_MODEL),
        NodeKind::Section => Some(SECTION_MODEL),
        NodeKind::Title => Some(TITLE_MODEL),
        NodeKind::Paragraph => Some(PARAGRAPH_MODEL),
        NodeKind::Block => Some(BLOCK_MODEL),
        NodeKind::BlockRow => Some(BLOCK_ROW_MODEL),
        NodeKind::Image => Some(IMAGE_MODEL),
        NodeKind::BlockColumn => None,
    }
}

/// Node kind a model path decodes to.
pub fn kind_for_model(path: &str) -> Option<NodeKind> {
    match path {
        PAGE_MODEL => Some(NodeKind::Page),
        SECTION_MODEL => Some(NodeKind::Section),
        TITLE_MODEL => Some(NodeKind::Title),
        PARAGRAPH_MODEL => Some(NodeKind::Paragraph),
        BLOCK_MODEL => Some(NodeKind::Block),
        BLOCK_ROW_MODEL => Some(NodeKind::BlockRow),
        IMAGE_MODEL => Some(NodeKind::Image),
        _ => None,
    }
}

/// Base64 model identifier a write payload carries for a model path.
pub fn encode_model_id(model_path: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(model_path)
}

/// Decode a payload's model identifier back to the node kind it names.
pub fn decode_model_id(model_id: &str) -> Result<NodeKind> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(model_id)
        .map_err(|_| Error::UnknownModel(model_id.to_string()))?;
    let path =
        String::from_utf8(bytes).map_err(|_| Error::UnknownModel(model_id.to_string()))?;
    kind_for_model(&path).ok_or(Error::UnknownModel(path))
}
