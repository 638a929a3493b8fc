use crate::record::{CorrelationKey, FieldValue, ParsedLogRecord, RecordKind};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// One document per logical invocation, ready to persist to the index.
///
/// May be partial (only one producer kind seen in this batch); the
/// writer's conflict path completes it across batches.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument {
    pub id: CorrelationKey,
    pub fields: BTreeMap<String, FieldValue>,
}

/// Group parsed records by correlation key and merge each group into one
/// document.
///
/// Matching the two producer kinds within a batch saves a remote
/// existence check per record; records whose counterpart is processed by
/// a different invocation converge later through the writer.
///
/// Merge rule: key union, with Report values overriding Invocation values
/// on collision. The rule is keyed by producer kind rather than arrival
/// order, so merging is commutative. Groups larger than two are a
/// correlation anomaly (duplicate redelivery within one batch); they fold
/// under the same rule so duplicates collapse idempotently, and are
/// logged rather than dropped.
pub fn correlate(records: Vec<ParsedLogRecord>) -> Vec<MergedDocument> {
    let mut order: Vec<CorrelationKey> = Vec::new();
    let mut groups: HashMap<CorrelationKey, Vec<ParsedLogRecord>> = HashMap::new();

    for record in records {
        let group = groups.entry(record.key.clone()).or_insert_with(|| {
            order.push(record.key.clone());
            Vec::new()
        });
        group.push(record);
    }

    order
        .into_iter()
        .map(|key| {
            let group = groups.remove(&key).unwrap_or_default();
            merge_group(key, group)
        })
        .collect()
}

fn merge_group(key: CorrelationKey, records: Vec<ParsedLogRecord>) -> MergedDocument {
    if records.len() > 2 {
        warn!(
            correlation_key = %key,
            group_size = records.len(),
            "correlation group larger than expected pair, folding duplicates"
        );
    }

    let mut fields = BTreeMap::new();
    for record in records.iter().filter(|r| r.kind == RecordKind::Invocation) {
        fields.extend(record.fields.clone());
    }
    for record in records.iter().filter(|r| r.kind == RecordKind::Report) {
        fields.extend(record.fields.clone());
    }

    MergedDocument { id: key, fields }
}
