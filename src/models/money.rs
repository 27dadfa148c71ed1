use crate::error::{AppError, AppResult};

/// Parse a non-negative decimal amount string into integer cents.
///
/// Accepts plain decimals like "450", "25.5" or "25.50". Negative values,
/// non-numeric input and more than two decimal places are rejected.
pub fn parse_amount_cents(input: &str) -> AppResult<i64> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AppError::Validation("Amount is empty".into()));
    }
    if s.starts_with('-') {
        return Err(AppError::Validation(format!(
            "Amount '{}' must not be negative",
            input
        )));
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(AppError::Validation(format!("Invalid amount '{}'", input)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!("Invalid amount '{}'", input)));
    }
    if frac.len() > 2 {
        return Err(AppError::Validation(format!(
            "Amount '{}' has more than two decimal places",
            input
        )));
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .ok()
            .and_then(|w| w.checked_mul(100))
            .ok_or_else(|| AppError::Validation(format!("Amount '{}' is too large", input)))?
    };

    let frac_cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().unwrap_or(0) * 10,
        _ => frac.parse::<i64>().unwrap_or(0),
    };

    whole_cents
        .checked_add(frac_cents)
        .ok_or_else(|| AppError::Validation(format!("Amount '{}' is too large", input)))
}

/// Format integer cents as a decimal string, e.g. 45000 -> "450.00".
pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let remainder = abs_cents % 100;

    if is_negative {
        format!("-{}.{:02}", whole, remainder)
    } else {
        format!("{}.{:02}", whole, remainder)
    }
}
