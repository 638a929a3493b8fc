use crate::payload::RawLogEvent;
use crate::record::{CorrelationKey, FieldValue, ParsedLogRecord, RecordKind};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized log type token '{0}'")]
    UnknownKind(String),

    #[error("log message is empty")]
    EmptyMessage,

    #[error("segment '{0}' does not match the 'key: value' shape")]
    MalformedSegment(String),

    #[error("field '{key}' has no leading numeric token in '{value}'")]
    NumericCoercion { key: String, value: String },

    #[error("event id '{0}' does not carry an 11-digit correlation prefix")]
    BadEventId(String),
}

/// Coercion rule applied to a field's raw value, keyed by normalized
/// field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    Text,
    Integer,
    Float,
    LinkList,
}

fn coercion_for(key: &str) -> Coercion {
    match key {
        "Duration" | "BilledDuration" | "MemorySize" | "MaxMemoryUsed" => Coercion::Float,
        "ItemCount" => Coercion::Integer,
        "ItemLinks" => Coercion::LinkList,
        _ => Coercion::Text,
    }
}

/// Parse one raw log event into a typed partial record.
///
/// The message's first token classifies it as an Invocation (`LOGS`) or
/// Report (`REPORT`) record; the rest is tab-separated `Key: value`
/// segments. Keys are normalized by removing embedded spaces, so the
/// runtime's `Billed Duration` and `Max Memory Used` spellings land on
/// the same fields as their compact forms.
pub fn parse_event(event: &RawLogEvent) -> Result<ParsedLogRecord, ParseError> {
    let key = CorrelationKey::from_event_id(&event.id)?;

    let message = event.message.trim_end();
    let mut segments = message.split('\t');

    let first = segments.next().filter(|s| !s.is_empty()).ok_or(ParseError::EmptyMessage)?;

    let token = first.split(' ').next().unwrap_or_default();
    let kind = RecordKind::from_token(token).ok_or_else(|| ParseError::UnknownKind(token.to_string()))?;

    let mut fields = BTreeMap::new();
    fields.insert("id".to_string(), FieldValue::Text(key.as_str().to_string()));
    fields.insert("timestamp".to_string(), FieldValue::Int(event.timestamp));

    // The classification prefix ("LOGS " / "REPORT ") is part of the first
    // segment; the remainder of that segment is an ordinary key: value pair.
    let first_rest = first[token.len()..].trim_start();
    let pairs = std::iter::once(first_rest).chain(segments).filter(|s| !s.is_empty());

    for segment in pairs {
        let (raw_key, raw_value) = segment
            .split_once(": ")
            .ok_or_else(|| ParseError::MalformedSegment(segment.to_string()))?;
        let field_key = raw_key.replace(' ', "");

        let value = coerce_value(&field_key, raw_value)?;
        fields.insert(field_key, value);
    }

    Ok(ParsedLogRecord {
        kind,
        key,
        timestamp: event.timestamp,
        fields,
    })
}

fn coerce_value(key: &str, raw: &str) -> Result<FieldValue, ParseError> {
    match coercion_for(key) {
        Coercion::Text => Ok(FieldValue::Text(raw.to_string())),
        Coercion::Integer => leading_numeric_token(key, raw)?
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|_| numeric_error(key, raw)),
        Coercion::Float => leading_numeric_token(key, raw)?
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| numeric_error(key, raw)),
        Coercion::LinkList => Ok(FieldValue::TextList(parse_link_list(raw))),
    }
}

/// The first whitespace-delimited token of the raw value. Units trailing
/// the number (`ms`, `MB`) are dropped by taking only this token.
fn leading_numeric_token<'a>(key: &str, raw: &'a str) -> Result<&'a str, ParseError> {
    raw.split_whitespace().next().ok_or_else(|| numeric_error(key, raw))
}

fn numeric_error(key: &str, raw: &str) -> ParseError {
    ParseError::NumericCoercion {
        key: key.to_string(),
        value: raw.to_string(),
    }
}

/// Reconstruct the quote-delimited pseudo-list emitted for `ItemLinks`
/// into an actual ordered list of strings.
///
/// The raw form is `"a","b","c"`: splitting on the quote character leaves
/// the links interleaved with empty tokens and bare separators, both of
/// which are discarded.
fn parse_link_list(raw: &str) -> Vec<String> {
    raw.split('"')
        .filter(|token| {
            let stripped = token.trim();
            !stripped.is_empty() && stripped != ","
        })
        .map(|token| token.to_string())
        .collect()
}
