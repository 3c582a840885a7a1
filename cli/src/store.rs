//! File-backed fragment store.
//!
//! One JSON file holds every record, the page-path table, and a version
//! counter per record. It implements both capability traits so the CLI can
//! run the full transcoding flow against local state instead of a remote
//! content repository. Mutations happen in memory; [`JsonStore::save`]
//! persists them when a command finishes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use fragmark::fragment::schema;
use fragmark::{
    Error, FieldPayload, FragmentPayload, FragmentRecord, FragmentSink, FragmentSource, NodeKind,
    Reference, Result, VersionTag,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    /// Records by reference.
    records: BTreeMap<String, FragmentRecord>,
    /// Page path to root reference.
    pages: BTreeMap<String, String>,
    /// Version counter per record, bumped on update.
    versions: BTreeMap<String, u64>,
    /// Counter for disambiguating generated references.
    next_id: u64,
}

pub struct JsonStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonStore {
    /// Open a store file, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| Error::Transport(format!("reading {}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| Error::Transport(format!("parsing {}: {e}", path.display())))?
        } else {
            StoreData::default()
        };
        log::debug!("opened store {} with {} records", path.display(), data.records.len());
        Ok(Self {
            path: path.to_path_buf(),
            data: Mutex::new(data),
        })
    }

    /// Persist the current state back to the store file.
    pub fn save(&self) -> Result<()> {
        let data = self.locked()?;
        let raw = serde_json::to_string_pretty(&*data)
            .map_err(|e| Error::Transport(format!("encoding store: {e}")))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| Error::Transport(format!("writing {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Number of records currently held.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.locked()?.records.len())
    }

    /// Make sure a root record exists for a page path, creating an empty
    /// page on first use so the conditional update has something to target.
    pub fn ensure_page(&self, page_path: &str) -> Result<Reference> {
        let mut data = self.locked()?;
        if let Some(reference) = data.pages.get(page_path) {
            return Ok(Reference::new(reference.clone()));
        }
        data.next_id += 1;
        let reference = format!("/content/dam/fragments/root-{}", data.next_id);
        let record = FragmentRecord::new(&reference, schema::PAGE_MODEL)
            .with_values(schema::elements::SECTIONS, Vec::new());
        data.records.insert(reference.clone(), record);
        data.versions.insert(reference.clone(), 1);
        data.pages
            .insert(page_path.to_string(), reference.clone());
        log::debug!("created empty root {reference} for page path {page_path}");
        Ok(Reference::new(reference))
    }

    fn locked(&self) -> Result<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|_| Error::Transport("store mutex poisoned".to_string()))
    }
}

/// Reconstruct the read-side record a payload describes.
fn record_from_payload(
    reference: &str,
    model_path: &str,
    payload: &FragmentPayload,
) -> FragmentRecord {
    let mut record = FragmentRecord::new(reference, model_path);
    for field in &payload.fields {
        record = attach_field(record, field);
    }
    record
}

fn attach_field(record: FragmentRecord, field: &FieldPayload) -> FragmentRecord {
    if field.multiple == Some(true) || field.values.len() > 1 {
        record.with_values(&field.name, field.values.clone())
    } else if let Some(value) = field.values.first() {
        record.with_text(&field.name, value.clone())
    } else {
        record.with_values(&field.name, Vec::new())
    }
}

fn model_path_for(kind: NodeKind) -> Result<&'static str> {
    schema::model_path(kind).ok_or(Error::RejectedPayload {
        kind,
        detail: "kind has no fragment model".to_string(),
    })
}

#[async_trait::async_trait]
impl FragmentSource for JsonStore {
    async fn dereference(&self, reference: &Reference) -> Result<FragmentRecord> {
        let data = self.locked()?;
        data.records
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(reference.to_string()))
    }
}

#[async_trait::async_trait]
impl FragmentSink for JsonStore {
    async fn write(&self, kind: NodeKind, payload: FragmentPayload) -> Result<Reference> {
        let decoded = schema::decode_model_id(&payload.model_id).map_err(|e| {
            Error::RejectedPayload {
                kind,
                detail: e.to_string(),
            }
        })?;
        if decoded != kind {
            return Err(Error::RejectedPayload {
                kind,
                detail: format!("model id decodes to {decoded}"),
            });
        }

        let mut data = self.locked()?;
        let mut reference = format!("{}/{}", payload.parent_path, payload.title);
        if data.records.contains_key(&reference) {
            data.next_id += 1;
            reference = format!("{reference}-{}", data.next_id);
        }
        let record = record_from_payload(&reference, model_path_for(kind)?, &payload);
        data.records.insert(reference.clone(), record);
        data.versions.insert(reference.clone(), 1);
        Ok(Reference::new(reference))
    }

    async fn lookup(&self, page_path: &str) -> Result<Reference> {
        let data = self.locked()?;
        data.pages
            .get(page_path)
            .map(|reference| Reference::new(reference.clone()))
            .ok_or_else(|| Error::NotFound(page_path.to_string()))
    }

    async fn version_tag(&self, reference: &Reference) -> Result<VersionTag> {
        let data = self.locked()?;
        data.versions
            .get(reference.as_str())
            .map(|version| VersionTag::new(version.to_string()))
            .ok_or_else(|| Error::NotFound(reference.to_string()))
    }

    async fn update_root(
        &self,
        reference: &Reference,
        payload: FragmentPayload,
        expected: &VersionTag,
    ) -> Result<Reference> {
        let decoded = schema::decode_model_id(&payload.model_id).map_err(|e| {
            Error::RejectedPayload {
                kind: NodeKind::Page,
                detail: e.to_string(),
            }
        })?;
        if decoded != NodeKind::Page {
            return Err(Error::RejectedPayload {
                kind: decoded,
                detail: "root update must carry a page payload".to_string(),
            });
        }

        let mut data = self.locked()?;
        let current = *data
            .versions
            .get(reference.as_str())
            .ok_or_else(|| Error::NotFound(reference.to_string()))?;
        if expected.as_str() != current.to_string() {
            return Err(Error::VersionConflict {
                reference: reference.to_string(),
                expected: expected.to_string(),
            });
        }

        let record = record_from_payload(reference.as_str(), schema::PAGE_MODEL, &payload);
        data.records.insert(reference.as_str().to_string(), record);
        data.versions
            .insert(reference.as_str().to_string(), current + 1);
        Ok(reference.clone())
    }
}
