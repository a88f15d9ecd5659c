use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use crate::services::dialogue::{BirthDate, BirthTime};

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$")
        .context("Failed to create birth date regex")
        .unwrap()
});

static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$")
        .context("Failed to create birth time regex")
        .unwrap()
});

/// Literal a user may send instead of an exact birth time; maps to noon.
pub const UNKNOWN_TIME: &str = "unknown";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid date format")]
    BadDateFormat,

    #[error("That day does not exist in the calendar")]
    BadCalendarDate,

    #[error("The year must be between 1900 and the current year")]
    YearOutOfRange,

    #[error("Invalid time format")]
    BadTimeFormat,

    #[error("That answer is too short")]
    TooShort,
}

/// Strict DD.MM.YYYY with a real calendar check (month lengths, leap years).
pub fn parse_birth_date(input: &str) -> Result<BirthDate, ValidationError> {
    let caps = DATE_REGEX
        .captures(input.trim())
        .ok_or(ValidationError::BadDateFormat)?;

    let day: u32 = caps[1].parse().map_err(|_| ValidationError::BadDateFormat)?;
    let month: u32 = caps[2].parse().map_err(|_| ValidationError::BadDateFormat)?;
    let year: i32 = caps[3].parse().map_err(|_| ValidationError::BadDateFormat)?;

    if !(1900..=Utc::now().year()).contains(&year) {
        return Err(ValidationError::YearOutOfRange);
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .map(BirthDate)
        .ok_or(ValidationError::BadCalendarDate)
}

/// 24-hour HH:MM, or the `unknown` literal for people without an exact time.
pub fn parse_birth_time(input: &str) -> Result<BirthTime, ValidationError> {
    let input = input.trim();

    if input.eq_ignore_ascii_case(UNKNOWN_TIME) {
        return NaiveTime::from_hms_opt(12, 0, 0)
            .map(BirthTime)
            .ok_or(ValidationError::BadTimeFormat);
    }

    let caps = TIME_REGEX
        .captures(input)
        .ok_or(ValidationError::BadTimeFormat)?;
    let hour: u32 = caps[1].parse().map_err(|_| ValidationError::BadTimeFormat)?;
    let minute: u32 = caps[2].parse().map_err(|_| ValidationError::BadTimeFormat)?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(BirthTime)
        .ok_or(ValidationError::BadTimeFormat)
}

/// Names and places: anything non-trivially short passes.
pub fn parse_free_text(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.chars().count() < 2 {
        return Err(ValidationError::TooShort);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        assert_eq!(parse_birth_date("15.06.1990").unwrap().to_string(), "15.06.1990");
        // 2024 is a leap year.
        assert!(parse_birth_date("29.02.2024").is_ok());
        assert!(parse_birth_date(" 01.01.2000 ").is_ok());
    }

    #[test]
    fn test_invalid_calendar_dates() {
        assert_eq!(
            parse_birth_date("29.02.2023"),
            Err(ValidationError::BadCalendarDate)
        );
        // April has 30 days.
        assert_eq!(
            parse_birth_date("31.04.2025"),
            Err(ValidationError::BadCalendarDate)
        );
        assert_eq!(
            parse_birth_date("00.01.2000"),
            Err(ValidationError::BadCalendarDate)
        );
    }

    #[test]
    fn test_bad_date_formats() {
        assert_eq!(parse_birth_date("1.6.1990"), Err(ValidationError::BadDateFormat));
        assert_eq!(parse_birth_date("15/06/1990"), Err(ValidationError::BadDateFormat));
        assert_eq!(parse_birth_date("birthday"), Err(ValidationError::BadDateFormat));
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(parse_birth_date("15.06.1899"), Err(ValidationError::YearOutOfRange));
        assert_eq!(parse_birth_date("15.06.3000"), Err(ValidationError::YearOutOfRange));
    }

    #[test]
    fn test_valid_times() {
        assert_eq!(parse_birth_time("14:30").unwrap().to_string(), "14:30");
        assert_eq!(parse_birth_time("00:00").unwrap().to_string(), "00:00");
        assert_eq!(parse_birth_time("23:59").unwrap().to_string(), "23:59");
    }

    #[test]
    fn test_unknown_time_maps_to_noon() {
        assert_eq!(parse_birth_time("unknown").unwrap().to_string(), "12:00");
        assert_eq!(parse_birth_time("Unknown").unwrap().to_string(), "12:00");
    }

    #[test]
    fn test_bad_times() {
        assert_eq!(parse_birth_time("24:00"), Err(ValidationError::BadTimeFormat));
        assert_eq!(parse_birth_time("9:30"), Err(ValidationError::BadTimeFormat));
        assert_eq!(parse_birth_time("soonish"), Err(ValidationError::BadTimeFormat));
    }

    #[test]
    fn test_free_text_length() {
        assert_eq!(parse_free_text("  Kyiv  "), Ok("Kyiv"));
        assert_eq!(parse_free_text("x"), Err(ValidationError::TooShort));
        assert_eq!(parse_free_text("   "), Err(ValidationError::TooShort));
    }
}
