//! Read-side fragment records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fragment::schema;
use crate::model::NodeKind;

/// One fragment record as the content repository returns it.
///
/// Wire shape: the model identifier lives at `properties."cq:model".path`
/// and each element at `properties.elements.<name>.value`, where `value` is
/// either one string or an array of strings. Records are fetched on demand
/// and owned by a single resolve call; nothing caches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Repository path the record was fetched from.
    pub path: String,
    pub properties: RecordProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordProperties {
    #[serde(rename = "cq:model")]
    pub model: ModelRef,
    #[serde(default)]
    pub elements: BTreeMap<String, Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRef {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub value: Option<ElementValue>,
}

/// A single- or multi-valued element body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Many(Vec<String>),
    One(String),
}

impl FragmentRecord {
    /// Build a record in memory; file-backed stores and tests use this.
    pub fn new(path: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            properties: RecordProperties {
                model: ModelRef {
                    path: model_path.into(),
                },
                elements: BTreeMap::new(),
            },
        }
    }

    /// Attach a single-valued element.
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.properties.elements.insert(
            name.to_string(),
            Element {
                value: Some(ElementValue::One(value.into())),
            },
        );
        self
    }

    /// Attach a multi-valued element.
    pub fn with_values(mut self, name: &str, values: Vec<String>) -> Self {
        self.properties.elements.insert(
            name.to_string(),
            Element {
                value: Some(ElementValue::Many(values)),
            },
        );
        self
    }

    /// Node kind this record's model decodes to.
    pub fn kind(&self) -> Result<NodeKind> {
        schema::kind_for_model(&self.properties.model.path)
            .ok_or_else(|| Error::UnknownModel(self.properties.model.path.clone()))
    }

    /// Single string value of an element, if present and non-empty.
    pub fn text(&self, name: &str) -> Option<&str> {
        let element = self.properties.elements.get(name)?;
        match element.value.as_ref()? {
            ElementValue::One(value) => Some(value),
            ElementValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Single string value of an element the model requires.
    pub fn require_text(&self, name: &str) -> Result<&str> {
        self.text(name).ok_or_else(|| Error::MalformedRecord {
            reference: self.path.clone(),
            detail: format!("missing element '{name}'"),
        })
    }

    /// All values of an element; empty when the element is absent.
    pub fn values(&self, name: &str) -> Vec<String> {
        match self.properties.elements.get(name).and_then(|e| e.value.as_ref()) {
            Some(ElementValue::Many(values)) => values.clone(),
            Some(ElementValue::One(value)) => vec![value.clone()],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_single_and_multi() {
        let json = r#"{
            "path": "/content/dam/fragments/sec-1",
            "properties": {
                "cq:model": { "path": "/conf/global/settings/dam/cfm/models/section" },
                "elements": {
                    "children": { "value": ["/content/dam/fragments/t-1", "/content/dam/fragments/p-1"] }
                }
            }
        }"#;
        let record: FragmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind().unwrap(), NodeKind::Section);
        assert_eq!(
            record.values(schema::elements::CHILDREN),
            vec![
                "/content/dam/fragments/t-1".to_string(),
                "/content/dam/fragments/p-1".to_string(),
            ]
        );

        let json = r#"{
            "path": "/content/dam/fragments/t-1",
            "properties": {
                "cq:model": { "path": "/conf/global/settings/dam/cfm/models/title" },
                "elements": { "title": { "value": "Hi" } }
            }
        }"#;
        let record: FragmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.text(schema::elements::TITLE), Some("Hi"));
    }

    #[test]
    fn test_unknown_model() {
        let record = FragmentRecord::new("/content/x", "/conf/other/model");
        assert!(matches!(record.kind(), Err(Error::UnknownModel(_))));
    }

    #[test]
    fn test_missing_required_element() {
        let record = FragmentRecord::new("/content/x", schema::TITLE_MODEL);
        let err = record.require_text(schema::elements::TITLE).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_null_value_reads_as_absent() {
        let json = r#"{
            "path": "/content/x",
            "properties": {
                "cq:model": { "path": "/conf/global/settings/dam/cfm/models/paragraph" },
                "elements": { "paragraph": { "value": null } }
            }
        }"#;
        let record: FragmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.text("paragraph"), None);
        assert!(record.values("paragraph").is_empty());
    }

    #[test]
    fn test_builder_round_trips_through_json() {
        let record = FragmentRecord::new("/content/x", schema::BLOCK_MODEL)
            .with_text(schema::elements::BLOCK_NAME, "hero")
            .with_values(schema::elements::ROWS, vec!["/content/r1".to_string()]);
        let json = serde_json::to_string(&record).unwrap();
        let back: FragmentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
