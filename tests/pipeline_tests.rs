/// End-to-end tests for the log indexing pipeline
///
/// These tests validate complete workflows against the in-memory store:
/// - Same-batch correlation of an Invocation/Report pair
/// - Cross-batch convergence through the create/conflict write path
/// - Idempotence under redelivery
/// - Order independence between the two producer kinds
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use staclog::config::types::{ParseErrorStrategy, WriteMode};
use staclog::index::memory::MemoryIndexStore;
use staclog::index::name::daily_index_name;
use staclog::pipeline::Pipeline;
use staclog::record::FieldValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

const INVOCATION_MSG: &str = "LOGS\tRequestId: 12345678901987\tCollectionName: testcol\tItemCount: 3 items\tItemLinks: \"a\",\"b\",\"c\"";
const REPORT_MSG: &str = "REPORT\tRequestId: 12345678901654\tDuration: 120.5 ms\tBilledDuration: 121.0 ms\tMemorySize: 512 MB\tMaxMemoryUsed: 130.2 MB";

// 2019-01-01T00:00:00Z
const DAY_ONE_MS: i64 = 1546300800000;

/// Helper: encode a JSON envelope the way the transport delivers it.
fn encode_envelope(events: &[(&str, i64, &str)]) -> String {
    let events: Vec<serde_json::Value> = events
        .iter()
        .map(|(id, timestamp, message)| {
            serde_json::json!({"id": id, "timestamp": timestamp, "message": message})
        })
        .collect();
    let json = serde_json::json!({ "logEvents": events }).to_string();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes()).unwrap();
    BASE64.encode(encoder.finish().unwrap())
}

fn safe_pipeline(store: Arc<MemoryIndexStore>) -> Pipeline {
    Pipeline::with_policy(
        store,
        "stac_updater_logs_",
        WriteMode::Safe,
        ParseErrorStrategy::Abort,
    )
}

fn day_one_document(store: &MemoryIndexStore) -> Option<BTreeMap<String, FieldValue>> {
    let index = daily_index_name("stac_updater_logs_", DAY_ONE_MS).unwrap();
    store.document(&index, "12345678901")
}

#[tokio::test]
async fn test_same_batch_scenario_merges_both_kinds() {
    let store = Arc::new(MemoryIndexStore::new());
    let payload = encode_envelope(&[
        ("12345678901987", DAY_ONE_MS, INVOCATION_MSG),
        ("12345678901654", DAY_ONE_MS + 1000, REPORT_MSG),
    ]);

    let summary = safe_pipeline(store.clone()).process(&payload).await.unwrap();

    assert_eq!(summary.index, "stac_updater_logs_20190101");
    assert_eq!(summary.events, 2);
    assert_eq!(summary.documents, 1);
    assert_eq!(summary.created, 1);

    let doc = day_one_document(&store).unwrap();
    assert_eq!(doc.get("id"), Some(&FieldValue::Text("12345678901".into())));
    assert_eq!(
        doc.get("CollectionName"),
        Some(&FieldValue::Text("testcol".into()))
    );
    assert_eq!(doc.get("ItemCount"), Some(&FieldValue::Int(3)));
    assert_eq!(
        doc.get("ItemLinks"),
        Some(&FieldValue::TextList(vec![
            "a".into(),
            "b".into(),
            "c".into()
        ]))
    );
    assert_eq!(doc.get("Duration"), Some(&FieldValue::Float(120.5)));
    assert_eq!(doc.get("BilledDuration"), Some(&FieldValue::Float(121.0)));
    assert_eq!(doc.get("MemorySize"), Some(&FieldValue::Float(512.0)));
    assert_eq!(doc.get("MaxMemoryUsed"), Some(&FieldValue::Float(130.2)));
}

#[tokio::test]
async fn test_cross_batch_convergence() {
    let store = Arc::new(MemoryIndexStore::new());
    let pipeline = safe_pipeline(store.clone());
    let index = daily_index_name("stac_updater_logs_", DAY_ONE_MS).unwrap();

    // First delivery carries only the Invocation record.
    let first = encode_envelope(&[("12345678901987", DAY_ONE_MS, INVOCATION_MSG)]);
    let summary = pipeline.process(&first).await.unwrap();
    assert_eq!(summary.created, 1);

    let partial = day_one_document(&store).unwrap();
    assert_eq!(
        partial.get("CollectionName"),
        Some(&FieldValue::Text("testcol".into()))
    );
    assert!(partial.get("Duration").is_none());

    // A later invocation processes the matching Report alone.
    let second = encode_envelope(&[("12345678901654", DAY_ONE_MS + 60_000, REPORT_MSG)]);
    let summary = pipeline.process(&second).await.unwrap();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.merged, 1);

    let complete = day_one_document(&store).unwrap();
    assert_eq!(
        complete.get("CollectionName"),
        Some(&FieldValue::Text("testcol".into()))
    );
    assert_eq!(complete.get("Duration"), Some(&FieldValue::Float(120.5)));
    assert_eq!(store.document_count(&index), 1);
}

#[tokio::test]
async fn test_redelivery_is_idempotent() {
    let store = Arc::new(MemoryIndexStore::new());
    let pipeline = safe_pipeline(store.clone());
    let index = daily_index_name("stac_updater_logs_", DAY_ONE_MS).unwrap();

    let payload = encode_envelope(&[
        ("12345678901987", DAY_ONE_MS, INVOCATION_MSG),
        ("12345678901654", DAY_ONE_MS + 1000, REPORT_MSG),
    ]);

    pipeline.process(&payload).await.unwrap();
    let after_first = day_one_document(&store).unwrap();

    // At-least-once delivery: the platform may hand us the same batch again.
    let summary = pipeline.process(&payload).await.unwrap();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.merged, 1);

    let after_second = day_one_document(&store).unwrap();
    assert_eq!(after_first, after_second);
    assert_eq!(store.document_count(&index), 1);
}

#[tokio::test]
async fn test_order_independence_across_batches() {
    let invocation_first = Arc::new(MemoryIndexStore::new());
    let report_first = Arc::new(MemoryIndexStore::new());

    let invocation = encode_envelope(&[("12345678901987", DAY_ONE_MS, INVOCATION_MSG)]);
    let report = encode_envelope(&[("12345678901654", DAY_ONE_MS + 1000, REPORT_MSG)]);

    let pipeline = safe_pipeline(invocation_first.clone());
    pipeline.process(&invocation).await.unwrap();
    pipeline.process(&report).await.unwrap();

    let pipeline = safe_pipeline(report_first.clone());
    pipeline.process(&report).await.unwrap();
    pipeline.process(&invocation).await.unwrap();

    let forward = day_one_document(&invocation_first).unwrap();
    let reverse = day_one_document(&report_first).unwrap();

    // Both orders converge to the same field set. The keys both kinds
    // carry (RequestId, timestamp) keep the value of the most recent
    // write, which is the expected partial-update behavior; every
    // kind-specific field is identical under either order.
    let forward_keys: Vec<&String> = forward.keys().collect();
    let reverse_keys: Vec<&String> = reverse.keys().collect();
    assert_eq!(forward_keys, reverse_keys);

    assert_eq!(forward.get("CollectionName"), reverse.get("CollectionName"));
    assert_eq!(forward.get("ItemCount"), reverse.get("ItemCount"));
    assert_eq!(forward.get("ItemLinks"), reverse.get("ItemLinks"));
    assert_eq!(forward.get("Duration"), reverse.get("Duration"));
    assert_eq!(forward.get("BilledDuration"), reverse.get("BilledDuration"));
    assert_eq!(forward.get("MemorySize"), reverse.get("MemorySize"));
    assert_eq!(forward.get("MaxMemoryUsed"), reverse.get("MaxMemoryUsed"));
}

#[tokio::test]
async fn test_batches_on_different_days_use_separate_indices() {
    let store = Arc::new(MemoryIndexStore::new());
    let pipeline = safe_pipeline(store.clone());

    let day_two_ms = DAY_ONE_MS + 24 * 3600 * 1000;
    let day_one = encode_envelope(&[("12345678901987", DAY_ONE_MS, INVOCATION_MSG)]);
    let day_two = encode_envelope(&[("99999999999001", day_two_ms, INVOCATION_MSG)]);

    pipeline.process(&day_one).await.unwrap();
    pipeline.process(&day_two).await.unwrap();

    assert_eq!(
        store.index_names(),
        vec!["stac_updater_logs_20190101", "stac_updater_logs_20190102"]
    );
}

#[tokio::test]
async fn test_overwrite_mode_replaces_stored_document() {
    let store = Arc::new(MemoryIndexStore::new());
    let pipeline = Pipeline::with_policy(
        store.clone(),
        "stac_updater_logs_",
        WriteMode::Overwrite,
        ParseErrorStrategy::Abort,
    );

    let invocation = encode_envelope(&[("12345678901987", DAY_ONE_MS, INVOCATION_MSG)]);
    let report = encode_envelope(&[("12345678901654", DAY_ONE_MS + 1000, REPORT_MSG)]);

    pipeline.process(&invocation).await.unwrap();
    let summary = pipeline.process(&report).await.unwrap();
    assert_eq!(summary.replaced, 1);

    // No conflict handling in overwrite mode: the Report replaced the
    // Invocation document instead of merging into it.
    let doc = day_one_document(&store).unwrap();
    assert!(doc.get("CollectionName").is_none());
    assert_eq!(doc.get("Duration"), Some(&FieldValue::Float(120.5)));
}
