use crate::error::{ReportError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Fixed three-letter abbreviation for a 1-indexed calendar month.
pub fn month_abbrev(month: u32) -> &'static str {
    debug_assert!((1..=12).contains(&month));
    MONTH_ABBREVIATIONS[(month as usize - 1) % 12]
}

/// Calendar quarter (1-4) containing the given month.
pub fn quarter_of_month(month: u32) -> u32 {
    month.div_ceil(3)
}

pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Signed whole-month distance between two dates, ignoring day-of-month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let year_diff = end.year() - start.year();
    let month_diff = end.month() as i32 - start.month() as i32;
    year_diff * 12 + month_diff
}

/// Shifts a (year, month) pair by a signed number of months, carrying
/// across year boundaries in both directions.
pub fn shift_year_month(year: i32, month: u32, offset_months: i32) -> (i32, u32) {
    let absolute = year * 12 + (month as i32 - 1) + offset_months;
    (absolute.div_euclid(12), (absolute.rem_euclid(12) + 1) as u32)
}

/// Parses a "YYYY-MM" token into a (year, month) pair.
pub fn parse_month_token(token: &str) -> Result<(i32, u32)> {
    let date_str = format!("{}-01", token.trim());
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| ReportError::WindowParse(token.to_string()))?;
    Ok((date.year(), date.month()))
}
