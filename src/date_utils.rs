use chrono::{Datelike, Local, NaiveDate};

use crate::error::{AppError, AppResult};

/// Parse an ISO `YYYY-MM-DD` date string.
pub fn parse_iso_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
}

/// Parse a `YYYY-MM` month key into the first day of that month.
pub fn parse_month_key(month: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid month '{}', expected YYYY-MM", month)))
}

/// Add `offset` calendar months to a month key, rolling over year boundaries.
/// The offset may be negative.
pub fn shift_month(month: &str, offset: i32) -> AppResult<String> {
    let first = parse_month_key(month)?;
    let total_months = first.year() * 12 + first.month() as i32 - 1 + offset;
    let year = total_months.div_euclid(12);
    let month0 = total_months.rem_euclid(12) as u32;
    Ok(format!("{:04}-{:02}", year, month0 + 1))
}

/// Calendar-correct number of days in a month, including leap years.
pub fn days_in_month(month: &str) -> AppResult<u32> {
    let (_, last) = month_bounds_dates(month)?;
    Ok(last.day())
}

/// Extract the `YYYY-MM` month key from an ISO date.
pub fn month_key_of(date: &str) -> AppResult<String> {
    let parsed = parse_iso_date(date)?;
    Ok(format!("{:04}-{:02}", parsed.year(), parsed.month()))
}

/// First and last ISO dates of a month, for date-windowed queries.
pub fn month_bounds(month: &str) -> AppResult<(String, String)> {
    let (first, last) = month_bounds_dates(month)?;
    Ok((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}

fn month_bounds_dates(month: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = parse_month_key(month)?;
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    // Construction cannot fail: month is 1..=12 and day is 1
    let last = next_first.unwrap() - chrono::Duration::days(1);
    Ok((first, last))
}

/// Month key for today's date.
pub fn current_month_key() -> String {
    let today = Local::now().date_naive();
    format!("{:04}-{:02}", today.year(), today.month())
}

/// Human-readable heading for a month, e.g. "January 2024".
pub fn month_label(month: &str) -> AppResult<String> {
    let first = parse_month_key(month)?;
    Ok(first.format("%B %Y").to_string())
}
