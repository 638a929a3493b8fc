use serde_json::{json, Value};

/// The fixed field mapping every daily log index is created with.
pub fn log_index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": {"type": "text"},
                "BilledDuration": {"type": "float"},
                "CollectionName": {"type": "text"},
                "Duration": {"type": "float"},
                "ItemCount": {"type": "integer"},
                "ItemLinks": {"type": "text"},
                "MaxMemoryUsed": {"type": "float"},
                "MemorySize": {"type": "float"},
                "LogType": {"type": "text"},
                "RequestId": {"type": "text"},
                "timestamp": {
                    "type": "date",
                    "format": "epoch_millis"
                }
            }
        }
    })
}
