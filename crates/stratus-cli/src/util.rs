//! Utility functions for CLI operations.

use anyhow::Result;
use time::OffsetDateTime;

/// Parse a date/time argument.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
pub fn parse_datetime(s: &str) -> Result<OffsetDateTime> {
    // Try RFC3339 first
    if let Ok(dt) = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339) {
        return Ok(dt);
    }

    // Try date only (YYYY-MM-DD)
    let format = time::format_description::parse("[year]-[month]-[day]")?;
    if let Ok(date) = time::Date::parse(s, &format) {
        return Ok(date.with_hms(0, 0, 0)?.assume_utc());
    }

    anyhow::bail!("Invalid date/time format: {}. Use RFC3339 or YYYY-MM-DD", s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2024-03-07T12:30:00Z").unwrap();
        assert_eq!(dt, datetime!(2024-03-07 12:30:00 UTC));
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_datetime("2024-03-07T12:30:00+01:00").unwrap();
        assert_eq!(dt, datetime!(2024-03-07 11:30:00 UTC));
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let dt = parse_datetime("2024-03-07").unwrap();
        assert_eq!(dt, datetime!(2024-03-07 00:00:00 UTC));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_datetime("yesterday").unwrap_err();
        assert!(err.to_string().contains("Invalid date/time format"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_date() {
        assert!(parse_datetime("2024-13-01").is_err());
    }
}
