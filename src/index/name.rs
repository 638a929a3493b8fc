use chrono::{TimeZone, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexNameError {
    #[error("timestamp {0} out of range for a calendar date")]
    TimestampOutOfRange(i64),
}

/// Name of a calendar-day-scoped index partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexName(String);

impl IndexName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the daily index name for a batch from its first event's
/// timestamp: millis truncated to seconds, converted to the UTC calendar
/// date, rendered as `<prefix>YYYYMMDD`.
///
/// All events in one delivered batch are assumed to share a calendar day;
/// the name is computed once per batch, never per event.
pub fn daily_index_name(prefix: &str, timestamp_ms: i64) -> Result<IndexName, IndexNameError> {
    let date = Utc
        .timestamp_opt(timestamp_ms / 1000, 0)
        .single()
        .ok_or(IndexNameError::TimestampOutOfRange(timestamp_ms))?;

    Ok(IndexName(format!("{}{}", prefix, date.format("%Y%m%d"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "stac_updater_logs_";

    #[test]
    fn test_known_date() {
        // 2019-01-01T00:00:00Z
        let name = daily_index_name(PREFIX, 1546300800000).unwrap();
        assert_eq!(name.as_str(), "stac_updater_logs_20190101");
    }

    #[test]
    fn test_depends_only_on_utc_calendar_date() {
        let midnight = daily_index_name(PREFIX, 1546300800000).unwrap();
        let late_evening = daily_index_name(PREFIX, 1546300800000 + 23 * 3600 * 1000).unwrap();
        let next_day = daily_index_name(PREFIX, 1546300800000 + 24 * 3600 * 1000).unwrap();

        assert_eq!(midnight, late_evening);
        assert_ne!(midnight, next_day);
        assert_eq!(next_day.as_str(), "stac_updater_logs_20190102");
    }

    #[test]
    fn test_millisecond_component_ignored() {
        let a = daily_index_name(PREFIX, 1546300800000).unwrap();
        let b = daily_index_name(PREFIX, 1546300800999).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_prefix() {
        let name = daily_index_name("logs_", 1546300800000).unwrap();
        assert_eq!(name.as_str(), "logs_20190101");
    }
}
