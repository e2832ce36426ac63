//! Canonical timestamp handling.
//!
//! Sampling dates arrive from the host either as a bare date or as a full
//! date-time. Documents always store the canonical RFC 3339 UTC form, so the
//! date clauses of a filter compare consistently against stored values.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Format a timestamp in the canonical wire form (RFC 3339, UTC, second
/// precision).
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a canonical timestamp.
///
/// Accepts a full RFC 3339 date-time or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| Error::Validation(format!("unparseable timestamp \"{}\"", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_rfc3339_utc() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&t), "2024-01-01T09:30:00Z");
    }

    #[test]
    fn test_parse_full_datetime() {
        let t = parse_timestamp("2024-01-01T09:30:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_datetime_normalizes_to_utc() {
        let t = parse_timestamp("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let t = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("last tuesday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_round_trip() {
        let t = Utc.with_ymd_and_hms(2023, 11, 5, 23, 59, 59).unwrap();
        assert_eq!(parse_timestamp(&format_timestamp(&t)).unwrap(), t);
    }
}
