use chrono::{Datelike, NaiveDate};

use crate::errors::AppError;

pub const SUBJECT_MAX_CHARS: usize = 200;
pub const MESSAGE_MAX_CHARS: usize = 500;
pub const NOTES_MAX_CHARS: usize = 500;

pub const PERSON_NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 20;
pub const PET_NAME_MAX_CHARS: usize = 100;
pub const BREED_MAX_CHARS: usize = 50;
pub const MAX_PET_AGE_YEARS: i32 = 60;

/// Years a calendar date or timestamp may fall in. Keeps week arithmetic
/// far from chrono's limits and inside Postgres `TIMESTAMP`.
pub const MIN_CALENDAR_YEAR: i32 = 1;
pub const MAX_CALENDAR_YEAR: i32 = 9999;

pub const DEFAULT_NEXT_REMINDERS: i64 = 5;
pub const MAX_NEXT_REMINDERS: i64 = 50;

/// Non-blank text of at most `max_chars` characters.
pub fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    limit_text(field, value, max_chars)
}

pub fn limit_text(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_chars} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn non_negative_cents(field: &str, cents: i64) -> Result<(), AppError> {
    if cents < 0 {
        return Err(AppError::Validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Rejects empty optional text the same way as over-long text.
pub fn optional_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<(), AppError> {
    match value {
        None => Ok(()),
        Some(v) => require_text(field, v, max_chars),
    }
}

/// Loose shape check: one `@` with something on both sides.
pub fn email_shape(field: &str, value: &str) -> Result<(), AppError> {
    limit_text(field, value, EMAIL_MAX_CHARS)?;
    match value.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(AppError::Validation(format!(
            "{field} is not a valid email address"
        ))),
    }
}

pub fn pet_age(age_years: i32) -> Result<(), AppError> {
    if !(0..=MAX_PET_AGE_YEARS).contains(&age_years) {
        return Err(AppError::Validation(format!(
            "age_years must be between 0 and {MAX_PET_AGE_YEARS} (got {age_years})"
        )));
    }
    Ok(())
}

pub fn calendar_date(field: &str, date: NaiveDate) -> Result<NaiveDate, AppError> {
    if !(MIN_CALENDAR_YEAR..=MAX_CALENDAR_YEAR).contains(&date.year()) {
        return Err(AppError::Validation(format!(
            "{field} must be between years {MIN_CALENDAR_YEAR} and {MAX_CALENDAR_YEAR}"
        )));
    }
    Ok(date)
}

/// Resolves the `limit` query parameter of the next-reminders widget.
pub fn reminder_limit(requested: Option<i64>) -> Result<i64, AppError> {
    match requested {
        None => Ok(DEFAULT_NEXT_REMINDERS),
        Some(n) if (1..=MAX_NEXT_REMINDERS).contains(&n) => Ok(n),
        Some(n) => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_NEXT_REMINDERS} (got {n})"
        ))),
    }
}
