pub mod parser;
pub mod value;

pub use parser::{parse_event, ParseError};
pub use value::FieldValue;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of leading digits of an event id shared by both producer kinds
/// for the same logical invocation.
pub const CORRELATION_PREFIX_LEN: usize = 11;

/// The identifier prefix linking an Invocation record and a Report record
/// to the same underlying execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Derive the correlation key from a full event id.
    ///
    /// Only the first 11 digits are unique across the two producer kinds;
    /// trailing digits differ between them.
    pub fn from_event_id(id: &str) -> Result<Self, ParseError> {
        let prefix: String = id.chars().take(CORRELATION_PREFIX_LEN).collect();
        if prefix.len() < CORRELATION_PREFIX_LEN || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::BadEventId(id.to_string()));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Producer kind of a parsed record.
///
/// Invocation records carry application-level outcome fields (collection
/// name, item count, item links). Report records carry runtime cost fields
/// (durations, memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Invocation,
    Report,
}

impl RecordKind {
    /// Classify from the message's leading token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "LOGS" => Some(RecordKind::Invocation),
            "REPORT" => Some(RecordKind::Report),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Invocation => "LOGS",
            RecordKind::Report => "REPORT",
        }
    }
}

/// One typed partial record parsed from a raw log event. Never mutated
/// after creation.
#[derive(Debug, Clone)]
pub struct ParsedLogRecord {
    pub kind: RecordKind,
    pub key: CorrelationKey,
    pub timestamp: i64,
    pub fields: BTreeMap<String, FieldValue>,
}
