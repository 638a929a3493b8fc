use crate::correlate::MergedDocument;
use crate::index::name::IndexName;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index service returned status {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("document not found in index '{index}': {id}")]
    DocumentNotFound { index: String, id: String },

    #[error("document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a create-only document insert.
///
/// `AlreadyExists` is an expected, common result consumed by the writer
/// to choose the update path; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// The remote search/indexing store.
///
/// The only shared mutable resource across pipeline invocations; its
/// atomic create-if-absent semantics are the sole cross-invocation
/// synchronization primitive.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Whether the named index exists.
    async fn index_exists(&self, index: &IndexName) -> Result<bool, StoreError>;

    /// Create the named index with the fixed log mapping. Safe to retry:
    /// a concurrent "already exists" response is success.
    async fn create_index(&self, index: &IndexName) -> Result<(), StoreError>;

    /// Create-only insert keyed by the document id.
    async fn create_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<CreateOutcome, StoreError>;

    /// Merge the document's fields into the stored document with the same
    /// id, leaving fields absent from the incoming document untouched.
    async fn update_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError>;

    /// Replace the stored document unconditionally.
    async fn put_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError>;
}
