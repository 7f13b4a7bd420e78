use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const DATE_TIME_SEPARATOR: char = 'T';
const MIDNIGHT: &str = "00:00:00";

fn hour_minute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap())
}

/// Resolve raw date/time text into a single comparable instant.
///
/// Returns `None` ("unclassifiable") for anything that cannot be parsed.
/// Parse failures are swallowed here on purpose: an unclassifiable date is a
/// data-quality signal on one row, not a failure of the fetch.
pub fn classify(date_text: Option<&str>, time_text: Option<&str>) -> Option<NaiveDateTime> {
    let date = date_text.map(str::trim).filter(|date| !date.is_empty())?;

    // A date that already carries the separator is a complete timestamp and
    // the time field is ignored.
    let candidate = if date.contains(DATE_TIME_SEPARATOR) {
        date.to_string()
    } else {
        format!("{}{}{}", date, DATE_TIME_SEPARATOR, normalize_time(time_text))
    };

    parse_instant(&candidate)
}

/// Substitute midnight for null-like placeholders and pad a bare
/// hour:minute value with seconds.
fn normalize_time(time_text: Option<&str>) -> String {
    let trimmed = time_text.map(str::trim).unwrap_or("");

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "undefined" {
        return MIDNIGHT.to_string();
    }

    if hour_minute_pattern().is_match(trimmed) {
        return format!("{}:00", trimmed);
    }

    trimmed.to_string()
}

fn parse_instant(candidate: &str) -> Option<NaiveDateTime> {
    if let Ok(instant) = NaiveDateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M:%S") {
        return Some(instant);
    }

    if let Ok(instant) = NaiveDateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(instant);
    }

    if let Ok(instant) = NaiveDateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M") {
        return Some(instant);
    }

    // Offset-carrying timestamps are normalized to naive UTC.
    DateTime::parse_from_rfc3339(candidate)
        .ok()
        .map(|instant| instant.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_missing_date_is_unclassifiable() {
        assert_eq!(classify(None, Some("10:00")), None);
        assert_eq!(classify(Some(""), Some("10:00")), None);
        assert_eq!(classify(Some("   "), Some("10:00")), None);
    }

    #[test]
    fn test_unparseable_date_is_unclassifiable() {
        assert_eq!(classify(Some("not-a-date"), Some("10:00")), None);
        assert_eq!(classify(Some("2024-13-45"), Some("10:00")), None);
    }

    #[test]
    fn test_null_like_time_placeholders_mean_midnight() {
        let expected = classify(Some("2024-06-01"), Some("00:00:00"));
        assert!(expected.is_some());

        assert_eq!(classify(Some("2024-06-01"), None), expected);
        assert_eq!(classify(Some("2024-06-01"), Some("")), expected);
        assert_eq!(classify(Some("2024-06-01"), Some("null")), expected);
        assert_eq!(classify(Some("2024-06-01"), Some("NULL")), expected);
        assert_eq!(classify(Some("2024-06-01"), Some("undefined")), expected);
    }

    #[test]
    fn test_bare_hour_minute_gets_seconds_appended() {
        assert_eq!(
            classify(Some("2024-01-01"), Some("9:30")),
            Some(instant(2024, 1, 1, 9, 30, 0))
        );
        assert_eq!(
            classify(Some("2024-01-01"), Some("14:05")),
            Some(instant(2024, 1, 1, 14, 5, 0))
        );
    }

    #[test]
    fn test_date_with_separator_ignores_the_time_field() {
        assert_eq!(
            classify(Some("2024-03-10T08:15:00"), Some("23:59")),
            Some(instant(2024, 3, 10, 8, 15, 0))
        );
    }

    #[test]
    fn test_offset_timestamps_are_normalized_to_utc() {
        assert_eq!(
            classify(Some("2024-03-10T08:15:00Z"), None),
            Some(instant(2024, 3, 10, 8, 15, 0))
        );
        assert_eq!(
            classify(Some("2024-03-10T08:15:00+01:00"), None),
            Some(instant(2024, 3, 10, 7, 15, 0))
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let first = classify(Some("2024-01-01"), Some("9:30"));
        let second = classify(Some("2024-01-01"), Some("9:30"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_past_appointment_is_not_upcoming() {
        // Raw record {appointment_date: "2024-01-01", appointment_time: "9:30"}
        // observed from a 2025 clock.
        let resolved = classify(Some("2024-01-01"), Some("9:30")).unwrap();
        let now = instant(2025, 1, 1, 0, 0, 0);

        assert_eq!(resolved, instant(2024, 1, 1, 9, 30, 0));
        assert!(resolved < now);
    }
}
