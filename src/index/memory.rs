use crate::correlate::MergedDocument;
use crate::index::name::IndexName;
use crate::index::traits::{CreateOutcome, IndexStore, StoreError};
use crate::record::FieldValue;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory index store with the same create/conflict semantics as the
/// remote service (for testing).
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    indices: Mutex<HashMap<String, HashMap<String, BTreeMap<String, FieldValue>>>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored field map of a document, if present.
    pub fn document(&self, index: &IndexName, id: &str) -> Option<BTreeMap<String, FieldValue>> {
        let indices = self.indices.lock().unwrap();
        indices.get(index.as_str())?.get(id).cloned()
    }

    /// Number of documents held by the named index.
    pub fn document_count(&self, index: &IndexName) -> usize {
        let indices = self.indices.lock().unwrap();
        indices.get(index.as_str()).map_or(0, |docs| docs.len())
    }

    /// Names of all indices created so far, sorted.
    pub fn index_names(&self) -> Vec<String> {
        let indices = self.indices.lock().unwrap();
        let mut names: Vec<String> = indices.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn index_exists(&self, index: &IndexName) -> Result<bool, StoreError> {
        let indices = self.indices.lock().unwrap();
        Ok(indices.contains_key(index.as_str()))
    }

    async fn create_index(&self, index: &IndexName) -> Result<(), StoreError> {
        let mut indices = self.indices.lock().unwrap();
        indices.entry(index.as_str().to_string()).or_default();
        Ok(())
    }

    async fn create_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<CreateOutcome, StoreError> {
        let mut indices = self.indices.lock().unwrap();
        let documents = indices.entry(index.as_str().to_string()).or_default();

        if documents.contains_key(document.id.as_str()) {
            return Ok(CreateOutcome::AlreadyExists);
        }

        documents.insert(document.id.as_str().to_string(), document.fields.clone());
        Ok(CreateOutcome::Created)
    }

    async fn update_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError> {
        let mut indices = self.indices.lock().unwrap();
        let stored = indices
            .get_mut(index.as_str())
            .and_then(|documents| documents.get_mut(document.id.as_str()))
            .ok_or_else(|| StoreError::DocumentNotFound {
                index: index.as_str().to_string(),
                id: document.id.as_str().to_string(),
            })?;

        stored.extend(document.fields.clone());
        Ok(())
    }

    async fn put_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError> {
        let mut indices = self.indices.lock().unwrap();
        let documents = indices.entry(index.as_str().to_string()).or_default();
        documents.insert(document.id.as_str().to_string(), document.fields.clone());
        Ok(())
    }
}
