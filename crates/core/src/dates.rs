//! `vi-VN` date formatting for server-supplied timestamps.
//!
//! The API returns dates in a handful of shapes (RFC 3339, SQL datetime,
//! bare date); the tables always show them as `dd/mm/yyyy`, with the time
//! appended when one was present.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a raw timestamp for display, `dd/mm/yyyy hh:mm`.
///
/// Unparseable input is shown as-is rather than hidden; an empty string
/// becomes `N/A`, matching the table cells.
#[must_use]
pub fn format_datetime(raw: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d/%m/%Y %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%d/%m/%Y %H:%M").to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

/// Format a raw timestamp as a date only, `dd/mm/yyyy`.
#[must_use]
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d/%m/%Y").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%d/%m/%Y").to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_datetime() {
        assert_eq!(format_datetime("2025-03-14 09:05:00"), "14/03/2025 09:05");
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(format_datetime("2025-03-14T09:05:00+07:00"), "14/03/2025 09:05");
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(format_datetime("2025-03-14"), "14/03/2025");
        assert_eq!(format_date("2025-03-14 09:05:00"), "14/03/2025");
    }

    #[test]
    fn test_empty_shows_na() {
        assert_eq!(format_datetime(""), "N/A");
    }

    #[test]
    fn test_unknown_shape_passes_through() {
        assert_eq!(format_datetime("hôm qua"), "hôm qua");
    }
}
