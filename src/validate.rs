//! Field-level validators. Each is a pure function that pushes onto a shared
//! error list, so handlers can compose every check before deciding to write.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Require a non-empty string field. Yields the trimmed value when present.
pub fn require<'a>(
    value: Option<&'a str>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v),
        None => {
            errors.push(format!("{} is required", field));
            None
        }
    }
}

/// Optional field: absent is fine, supplied-but-empty is an error.
pub fn optional<'a>(
    value: Option<&'a str>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    let v = value?.trim();
    if v.is_empty() {
        errors.push(format!("{} must not be empty", field));
        None
    } else {
        Some(v)
    }
}

/// Basic `local@domain.tld` shape: no whitespace, an `@`, and a dot inside
/// the domain part.
pub fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Parse a calendar day from a date or datetime string, discarding any
/// time-of-day component. Two timestamps on the same day parse to the same
/// value, which is what makes the one-entry-per-day constraint hold no
/// matter what time the caller submitted.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(stamp.date());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(stamp.date());
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_flags_missing() {
        let mut errors = Vec::new();
        assert_eq!(require(Some("  E1  "), "employee_id", &mut errors), Some("E1"));
        assert_eq!(require(None, "name", &mut errors), None);
        assert_eq!(require(Some("   "), "email", &mut errors), None);
        assert_eq!(errors, vec!["name is required", "email is required"]);
    }

    #[test]
    fn optional_rejects_empty_but_not_absent() {
        let mut errors = Vec::new();
        assert_eq!(optional(None, "name", &mut errors), None);
        assert!(errors.is_empty());
        assert_eq!(optional(Some(""), "name", &mut errors), None);
        assert_eq!(errors, vec!["name must not be empty"]);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("Ann.Smith+hr@corp.example.co"));
        assert!(!is_valid_email("annexample.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann@.com"));
        assert!(!is_valid_email("ann smith@example.com"));
    }

    #[test]
    fn day_parsing_truncates_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_day("2024-01-05"), Some(day));
        assert_eq!(parse_day("2024-01-05T23:00:00"), Some(day));
        assert_eq!(parse_day("2024-01-05T23:59:59.999"), Some(day));
        assert_eq!(parse_day("2024-01-05 08:30:00"), Some(day));
        assert_eq!(parse_day("2024-01-05T23:00:00Z"), Some(day));
        assert_eq!(parse_day(" 2024-01-05 "), Some(day));
    }

    #[test]
    fn day_parsing_rejects_garbage() {
        assert_eq!(parse_day("next tuesday"), None);
        assert_eq!(parse_day("2024-13-01"), None);
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("05-01-2024"), None);
    }
}
