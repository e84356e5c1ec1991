//! Time formatting utilities

use chrono::{DateTime, Local, TimeZone};

/// Current local time in the format the CoCon GUI shows
pub fn now_str() -> String {
    format_datetime(&Local::now())
}

/// Format as `Date YYYY-MM-DD Time HH:MM`
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("Date %Y-%m-%d Time %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 42).unwrap();
        assert_eq!(format_datetime(&dt), "Date 2025-03-07 Time 09:05");
    }

    #[test]
    fn test_now_str_shape() {
        let s = now_str();
        assert!(s.starts_with("Date "));
        assert!(s.contains(" Time "));
        assert_eq!(s.len(), "Date 2025-03-07 Time 09:05".len());
    }
}
