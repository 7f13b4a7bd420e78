use chrono::{NaiveDate, NaiveTime};

/// Render a raw time value on a 12-hour clock ("14:05" -> "2:05 PM").
/// Unparseable input is returned verbatim rather than failing the row.
pub fn format_time_12h(time_text: &str) -> String {
    let trimmed = time_text.trim();

    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"));

    match parsed {
        Ok(time) => time.format("%-I:%M %p").to_string(),
        Err(_) => time_text.to_string(),
    }
}

/// Render a raw date value in long form ("2024-06-01" -> "Saturday, June 1, 2024").
/// Unparseable input is returned verbatim.
pub fn format_date_long(date_text: &str) -> String {
    match NaiveDate::parse_from_str(date_text.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => date_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_afternoon_times_on_a_12_hour_clock() {
        assert_eq!(format_time_12h("14:05"), "2:05 PM");
        assert_eq!(format_time_12h("14:05:30"), "2:05 PM");
    }

    #[test]
    fn test_formats_morning_and_boundary_times() {
        assert_eq!(format_time_12h("09:30:00"), "9:30 AM");
        assert_eq!(format_time_12h("00:15"), "12:15 AM");
        assert_eq!(format_time_12h("12:00"), "12:00 PM");
    }

    #[test]
    fn test_unparseable_time_passes_through() {
        assert_eq!(format_time_12h("soonish"), "soonish");
    }

    #[test]
    fn test_formats_dates_in_long_form() {
        assert_eq!(format_date_long("2024-06-01"), "Saturday, June 1, 2024");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(format_date_long("June-ish"), "June-ish");
    }
}
