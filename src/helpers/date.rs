//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a front-matter date string in various formats
///
/// Offsets are kept as written: the result is the wall-clock time the author
/// typed, not a conversion to the server's timezone.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 with an offset first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a post date for display (like "Mon Jan 01 2024")
///
/// Unparseable dates are shown as written.
pub fn display_date(s: &str) -> String {
    match parse_date_string(s) {
        Some(dt) => dt.format("%a %b %d %Y").to_string(),
        None => s.to_string(),
    }
}

/// Format a post date as `YYYY-MM-DD` for `<time datetime>` attributes
pub fn machine_date(s: &str) -> String {
    match parse_date_string(s) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_date_string("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024/01/15 10:30"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00.000Z"), Some(expected));
        assert!(parse_date_string("not a date").is_none());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-01"), "Mon Jan 01 2024");
        assert_eq!(display_date("2024-06-01T12:00:00.000Z"), "Sat Jun 01 2024");
        assert_eq!(display_date("someday"), "someday");
    }

    #[test]
    fn test_machine_date() {
        assert_eq!(machine_date("2024/06/01 09:00"), "2024-06-01");
    }
}
