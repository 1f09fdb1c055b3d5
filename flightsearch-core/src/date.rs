use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static TRAVEL_DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("travel date pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Date is missing")]
    Missing,

    #[error("Date is not in DD/MM/YYYY form: {0:?}")]
    Malformed(String),

    #[error("Month out of range: {0}")]
    MonthOutOfRange(u32),

    #[error("Day {day} out of range for {month:02}/{year:04} (max {max})")]
    DayOutOfRange {
        day: u32,
        month: u32,
        year: i32,
        max: u32,
    },
}

/// Gregorian leap year: divisible by 4, except centuries not divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`. Returns 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parse a travel date, rejecting anything that is not a real `DD/MM/YYYY` day.
///
/// Zero padding is mandatory and only ASCII digits are accepted.
pub fn parse_travel_date(raw: &str) -> Result<NaiveDate, DateError> {
    let caps = TRAVEL_DATE_SHAPE
        .captures(raw)
        .ok_or_else(|| DateError::Malformed(raw.to_string()))?;

    // The pattern guarantees ASCII digits, so these cannot fail.
    let field = |i: usize| -> Result<u32, DateError> {
        caps[i]
            .parse::<u32>()
            .map_err(|_| DateError::Malformed(raw.to_string()))
    };
    let day = field(1)?;
    let month = field(2)?;
    let year = field(3)? as i32;

    if !(1..=12).contains(&month) {
        return Err(DateError::MonthOutOfRange(month));
    }

    let max = days_in_month(year, month);
    if day == 0 || day > max {
        return Err(DateError::DayOutOfRange { day, month, year, max });
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateError::DayOutOfRange { day, month, year, max })
}

/// Parse an optional date field; an absent value is its own failure.
pub fn parse_optional_travel_date(raw: Option<&str>) -> Result<NaiveDate, DateError> {
    match raw {
        Some(raw) => parse_travel_date(raw),
        None => Err(DateError::Missing),
    }
}

/// Render a date as `DD/MM/YYYY`.
pub fn format_travel_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}
