//! Recognizers for constrained string formats.

/// Check for an ISO 8601 `YYYY-MM-DD` date.
pub fn is_date(x: &str) -> bool {
    if x.len() != 10 {
        return false;
    }
    chrono::NaiveDate::parse_from_str(x, "%Y-%m-%d").is_ok()
}

/// Check for an RFC 3339 date-time.
pub fn is_rfc3339(x: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(x).is_ok()
}
