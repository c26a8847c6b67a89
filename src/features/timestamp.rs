//! Timestamp parsing for trip records and requests

use crate::error::{FlightPriceError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Naive layouts tried after RFC 3339. `%.f` also accepts a missing fraction.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts with a space separator, which RFC 3339 rejects
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse an ISO-8601 style timestamp into wall-clock time.
///
/// Timestamps with an offset keep their own local time (the offset is
/// dropped, not converted). Bare dates resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FlightPriceError::Validation("Timestamp is empty".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.naive_local());
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(FlightPriceError::Validation(format!(
        "Unparseable timestamp: {:?}",
        raw
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_iso_without_offset() {
        let dt = parse_timestamp("2024-06-01T14:30:00").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_space_separated_and_fractional() {
        let dt = parse_timestamp("2024-06-01 09:05:00.250").unwrap();
        assert_eq!(dt.hour(), 9);
        let dt = parse_timestamp("2024-06-01 22:10").unwrap();
        assert_eq!(dt.hour(), 22);
    }

    #[test]
    fn test_parse_with_offset_keeps_local_hour() {
        let dt = parse_timestamp("2024-06-01T14:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 14);
        let dt = parse_timestamp("2024-06-01T06:00:00Z").unwrap();
        assert_eq!(dt.hour(), 6);
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let dt = parse_timestamp("2024-06-01").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_validation_error() {
        for raw in ["", "   ", "tomorrow", "2024-13-01T00:00:00", "01/06/2024"] {
            let err = parse_timestamp(raw).unwrap_err();
            assert!(matches!(err, FlightPriceError::Validation(_)), "{raw:?} gave {err:?}");
        }
    }
}
