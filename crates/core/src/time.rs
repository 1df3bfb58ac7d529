//! Timestamp parsing and formatting
//!
//! All engine times are UTC. Published timestamps use the fixed-width
//! `YYYY-MM-DDTHH:MM:SSZ` form, so comparing two of them as strings orders them in time.

use crate::error::{EngineError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Published timestamp format
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a timestamp, using `default` when `value` is absent or empty
///
/// Accepts RFC 3339 (`Z` or a numeric offset), naive `YYYY-MM-DDTHH:MM:SS` (assumed UTC)
/// and date-only `YYYY-MM-DD` (midnight UTC).
pub fn parse_time(value: Option<&str>, default: &str) -> Result<DateTime<Utc>> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => default,
    };
    parse_timestamp(raw)
}

/// Parse one timestamp in any of the accepted forms
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::InvalidTimestamp(raw.to_string()))
}

/// Format as `YYYY-MM-DDTHH:MM:SSZ`
pub fn to_iso(when: &DateTime<Utc>) -> String {
    when.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_zulu() {
        let t = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2020, 8, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let t = parse_timestamp("2020-08-15T05:00:00-07:00").unwrap();
        assert_eq!(to_iso(&t), "2020-08-15T12:00:00Z");
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            to_iso(&parse_timestamp("2020-08-16T06:30:00").unwrap()),
            "2020-08-16T06:30:00Z"
        );
        assert_eq!(
            to_iso(&parse_timestamp("2020-08-17").unwrap()),
            "2020-08-17T00:00:00Z"
        );
    }

    #[test]
    fn test_default_used_when_missing() {
        let t = parse_time(None, "2020-08-19T23:00:00Z").unwrap();
        assert_eq!(to_iso(&t), "2020-08-19T23:00:00Z");
        let t = parse_time(Some(""), "2020-08-19T23:00:00Z").unwrap();
        assert_eq!(to_iso(&t), "2020-08-19T23:00:00Z");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = parse_time(Some("yesterday"), "2020-08-19T23:00:00Z").unwrap_err();
        assert_eq!(err, EngineError::InvalidTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_iso_strings_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2020, 8, 15, 9, 0, 0).unwrap();
        let later = base + Duration::hours(6);
        assert!(to_iso(&base) < to_iso(&later));
        assert_eq!(to_iso(&later), "2020-08-15T15:00:00Z");
    }
}
