//! Date parsing and formatting for content fields, feeds and sitemaps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a content date.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+02:00`),
/// naive datetimes (`2024-01-15T10:30:00`, `2024-01-15 10:30:00`, read as UTC)
/// and plain dates (`2024-01-15`, midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `Mon, 15 Jan 2024 10:30:00 +0000`, for RSS `pubDate`.
pub fn to_rfc2822(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}

/// `2024-01-15`, for sitemap `lastmod`.
pub fn to_ymd(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// `Jan 15, 2024`, for page headers.
pub fn to_display(dt: DateTime<Utc>) -> String {
    dt.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_date("2024-06-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 6, 15));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_date("2024-06-15T14:30:45Z").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 45));

        // Offsets are normalized to UTC
        let dt = parse_date("2024-06-15T02:00:00+03:00").unwrap();
        assert_eq!((dt.day(), dt.hour()), (14, 23));
    }

    #[test]
    fn test_parse_naive_datetime() {
        assert_eq!(
            parse_date("2024-06-15T14:30:45"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 45).unwrap())
        );
        assert_eq!(
            parse_date("2024-06-15 14:30:45"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 45).unwrap())
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date("").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("15/06/2024").is_none());
        assert!(parse_date("2024-06-15T25:00:00Z").is_none());
    }

    #[test]
    fn test_parse_leap_day() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("1900-02-29").is_none());
    }

    #[test]
    fn test_to_rfc2822() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        assert_eq!(to_rfc2822(dt), "Mon, 15 Jan 2024 10:30:45 +0000");
    }

    #[test]
    fn test_to_ymd_and_display() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ymd(dt), "2024-03-01");
        assert_eq!(to_display(dt), "Mar 01, 2024");
    }
}
