//! Write-side fragment payloads.

use serde::{Deserialize, Serialize};

use crate::fragment::reference::Reference;
use crate::fragment::schema;

/// Creation payload for one fragment record.
///
/// Shape is fixed by the remote fragment API: a display title, the base64
/// model identifier, the container to create under, and the field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentPayload {
    pub title: String,
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(rename = "parentPath")]
    pub parent_path: String,
    pub fields: Vec<FieldPayload>,
}

impl FragmentPayload {
    /// Start a payload for the given model.
    pub fn new(
        title: impl Into<String>,
        model_path: &str,
        parent_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            model_id: schema::encode_model_id(model_path),
            parent_path: parent_path.into(),
            fields: Vec::new(),
        }
    }

    /// Append one field.
    pub fn with_field(mut self, field: FieldPayload) -> Self {
        self.fields.push(field);
        self
    }

    /// Field lookup by name.
    pub fn field(&self, name: &str) -> Option<&FieldPayload> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// One named field inside a payload.
///
/// `mimeType` and `multiple` are emitted only when set; which fields carry
/// them is part of the wire contract, so the constructors below encode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none", default)]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multiple: Option<bool>,
    pub values: Vec<String>,
}

impl FieldPayload {
    /// Plain single text value.
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Text,
            mime_type: None,
            multiple: None,
            values: vec![value.into()],
        }
    }

    /// Single enumeration value.
    pub fn enumeration(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Enumeration,
            mime_type: None,
            multiple: None,
            values: vec![value.into()],
        }
    }

    /// Single HTML-carrying long-text value.
    pub fn long_text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::LongText,
            mime_type: Some(schema::MIME_HTML.to_string()),
            multiple: None,
            values: vec![value.into()],
        }
    }

    /// Multi-valued HTML-carrying long-text field.
    pub fn long_text_values(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::LongText,
            mime_type: Some(schema::MIME_HTML.to_string()),
            multiple: Some(!values.is_empty()),
            values,
        }
    }

    /// Multi-valued child-reference field.
    pub fn references(name: &str, references: &[Reference]) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::ContentFragment,
            mime_type: None,
            multiple: Some(!references.is_empty()),
            values: references
                .iter()
                .map(|reference| reference.as_str().to_string())
                .collect(),
        }
    }

    /// Override the `multiple` flag.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = Some(multiple);
        self
    }
}

/// Field types the fragment models use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    LongText,
    Enumeration,
    ContentFragment,
}
