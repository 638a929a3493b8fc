use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("gzip decompression failed: {0}")]
    Gzip(#[from] std::io::Error),

    #[error("envelope parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("envelope contains no log events")]
    EmptyBatch,
}

/// One raw log line as delivered by the log-subscription transport.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLogEvent {
    pub id: String,
    pub timestamp: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "logEvents")]
    log_events: Vec<RawLogEvent>,
}

/// Unwrap a delivered batch envelope into its raw log events.
///
/// The transport delivers a base64-encoded, gzip-compressed JSON document
/// of the form `{"logEvents": [{"id", "timestamp", "message"}, ...]}`.
/// Any stage failing rejects the whole batch; no partial decode is
/// attempted.
pub fn decode_payload(payload: &str) -> Result<Vec<RawLogEvent>, DecodeError> {
    let compressed = BASE64.decode(payload.trim())?;

    let mut decoder = GzDecoder::new(&compressed[..]);
    let mut json = String::new();
    decoder.read_to_string(&mut json)?;

    let envelope: Envelope = serde_json::from_str(&json)?;

    if envelope.log_events.is_empty() {
        return Err(DecodeError::EmptyBatch);
    }

    Ok(envelope.log_events)
}

#[cfg(test)]
pub(crate) fn encode_payload(json: &str) -> String {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes()).unwrap();
    BASE64.encode(encoder.finish().unwrap())
}
