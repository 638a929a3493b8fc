use crate::config::types::WriteMode;
use crate::correlate::MergedDocument;
use crate::index::name::IndexName;
use crate::index::traits::{CreateOutcome, IndexStore, StoreError};
use tracing::debug;

/// How a document landed in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// First write ever seen for this correlation key.
    Created,
    /// A document with this key already existed; the incoming fields were
    /// merged into it.
    Merged,
    /// Overwrite mode: the stored document was replaced.
    Replaced,
}

/// Write one merged document under the configured policy.
///
/// Safe mode attempts a create-only insert keyed by the document id. A
/// conflict means another invocation (or an earlier delivery) already
/// wrote this key, so the incoming fields are merged into the stored
/// document instead. This is what lets an Invocation record and a Report
/// record processed in separate invocations converge into one complete
/// document; the store's create/conflict signal is the only
/// synchronization primitive involved. Redelivery of the same kind merges
/// identical data over itself, so the write is idempotent.
pub async fn write_document(
    store: &dyn IndexStore,
    index: &IndexName,
    document: &MergedDocument,
    mode: WriteMode,
) -> Result<WriteOutcome, StoreError> {
    match mode {
        WriteMode::Overwrite => {
            store.put_document(index, document).await?;
            Ok(WriteOutcome::Replaced)
        }
        WriteMode::Safe => match store.create_document(index, document).await? {
            CreateOutcome::Created => Ok(WriteOutcome::Created),
            CreateOutcome::AlreadyExists => {
                debug!(
                    index = %index,
                    id = %document.id,
                    "document exists, merging fields"
                );
                store.update_document(index, document).await?;
                Ok(WriteOutcome::Merged)
            }
        },
    }
}
