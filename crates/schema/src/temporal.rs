//! Date and date-time parsing shared by rule parsing and row validation

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 calendar date; a full date-time is truncated to its date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date()))
}

/// Parse an ISO 8601 date-time. Offsets are normalised to UTC and a bare
/// date means midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("2024-03-09T10:30"), Some(expected));
        assert_eq!(parse_date("09/03/2024"), None);
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-03-09T10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-03-09 10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-09T12:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_datetime("2024-03-09"),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("tomorrow"), None);
    }
}
