//! ISO-8601 instant parsing shared by range filters and sorting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Error returned when a value is not a parseable ISO-8601 instant.
#[derive(Debug, thiserror::Error)]
#[error("invalid ISO-8601 instant: {0}")]
pub struct InvalidInstant(String);

/// Parses an ISO-8601 instant.
///
/// Accepts RFC 3339 (`Z` or numeric offsets), a naive date-time, or a
/// bare date; naive values are interpreted as UTC. This mirrors the
/// tolerant parsing the stored documents were produced against.
///
/// # Errors
///
/// Returns [`InvalidInstant`] when none of the accepted forms match.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, InvalidInstant> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(InvalidInstant(value.to_string()))
}
