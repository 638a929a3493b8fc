use crate::config::types::{Config, ParseErrorStrategy, WriteMode};
use crate::correlate::correlate;
use crate::index::name::{daily_index_name, IndexNameError};
use crate::index::traits::{IndexStore, StoreError};
use crate::index::writer::{write_document, WriteOutcome};
use crate::payload::{decode_payload, DecodeError};
use crate::record::{parse_event, ParseError, ParsedLogRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while processing one batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("index name error: {0}")]
    IndexName(#[from] IndexNameError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// What one pipeline invocation did with its batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub index: String,
    pub events: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub documents: usize,
    pub created: usize,
    pub merged: usize,
    pub replaced: usize,
}

/// Per-batch orchestration: decode, parse, correlate, ensure the daily
/// index, write each document.
///
/// One instance is constructed at process start with an injected store
/// and reused across invocations; it holds no per-batch state. Each batch
/// is processed strictly sequentially. Concurrency exists only across
/// invocations, coordinated exclusively through the store's
/// create-if-absent semantics.
pub struct Pipeline {
    store: Arc<dyn IndexStore>,
    index_prefix: String,
    write_mode: WriteMode,
    on_parse_error: ParseErrorStrategy,
}

impl Pipeline {
    pub fn new(store: Arc<dyn IndexStore>, config: &Config) -> Self {
        Self {
            store,
            index_prefix: config.index.prefix.clone(),
            write_mode: config.index.write_mode,
            on_parse_error: config.pipeline.errors.on_parse_error,
        }
    }

    /// Construct with explicit policy, without a full config (for tests
    /// and embedding).
    pub fn with_policy(
        store: Arc<dyn IndexStore>,
        index_prefix: impl Into<String>,
        write_mode: WriteMode,
        on_parse_error: ParseErrorStrategy,
    ) -> Self {
        Self {
            store,
            index_prefix: index_prefix.into(),
            write_mode,
            on_parse_error,
        }
    }

    /// Process one delivered batch envelope end to end.
    ///
    /// Fatal errors (decode failure, parse failure under the abort
    /// policy, store/transport failure) reject the batch; recovery is the
    /// invoking platform's redelivery, so nothing is retried here.
    /// Redelivery of an already-processed batch converges to the same
    /// stored state.
    pub async fn process(&self, payload: &str) -> Result<BatchSummary, PipelineError> {
        let events = decode_payload(payload)?;

        // All events in one delivered batch are assumed to share a
        // calendar day; the index name comes from the first event only.
        let index = daily_index_name(&self.index_prefix, events[0].timestamp)?;

        info!(index = %index, events = events.len(), "processing log batch");

        let mut records: Vec<ParsedLogRecord> = Vec::with_capacity(events.len());
        let mut skipped = 0usize;
        for event in &events {
            match parse_event(event) {
                Ok(record) => records.push(record),
                Err(error) => match self.on_parse_error {
                    ParseErrorStrategy::Abort => return Err(error.into()),
                    ParseErrorStrategy::Skip => {
                        warn!(event_id = %event.id, %error, "skipping unparseable log event");
                        skipped += 1;
                    }
                },
            }
        }

        let parsed = records.len();
        let documents = correlate(records);

        if !self.store.index_exists(&index).await? {
            self.store.create_index(&index).await?;
        }

        let mut created = 0usize;
        let mut merged = 0usize;
        let mut replaced = 0usize;
        for document in &documents {
            match write_document(self.store.as_ref(), &index, document, self.write_mode).await? {
                WriteOutcome::Created => created += 1,
                WriteOutcome::Merged => merged += 1,
                WriteOutcome::Replaced => replaced += 1,
            }
            debug!(index = %index, id = %document.id, "indexed document");
        }

        let summary = BatchSummary {
            index: index.as_str().to_string(),
            events: events.len(),
            parsed,
            skipped,
            documents: documents.len(),
            created,
            merged,
            replaced,
        };

        info!(
            index = %summary.index,
            documents = summary.documents,
            created = summary.created,
            merged = summary.merged,
            skipped = summary.skipped,
            "batch indexed"
        );

        Ok(summary)
    }
}
