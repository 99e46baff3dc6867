//! Validation for employee-record creation.
//!
//! All problems are collected into one list and reported together, so the
//! operator fixes everything in a single round trip.

use staffbot_core::{AppError, NewEmployee};
use std::sync::OnceLock;

static NAME_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static EMAIL_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static PHONE_PATTERN: OnceLock<regex::Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn name_pattern() -> &'static regex::Regex {
    NAME_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[А-ЯЁа-яёA-Za-z\s'-]{2,50}$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn strict_email_pattern() -> &'static regex::Regex {
    EMAIL_PATTERN.get_or_init(|| {
        regex::Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn phone_pattern() -> &'static regex::Regex {
    PHONE_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[\d\s()+-]{7,20}$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name.trim())
}

fn is_valid_email(email: &str) -> bool {
    strict_email_pattern().is_match(email.trim())
}

fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    trimmed.is_empty() || phone_pattern().is_match(trimmed)
}

/// Check a creation payload. Returns `AppError::Validation` carrying every
/// problem found, or `Ok` when the payload is clean.
pub fn validate_new_employee(data: &NewEmployee) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if !is_valid_name(&data.first_name) {
        errors.push(
            "Имя обязательно и должно содержать 2-50 символов (только буквы, пробелы, дефисы)"
                .to_string(),
        );
    }

    if !is_valid_name(&data.last_name) {
        errors.push(
            "Фамилия обязательна и должна содержать 2-50 символов (только буквы, пробелы, дефисы)"
                .to_string(),
        );
    }

    if let Some(email) = data.email.as_deref() {
        if !email.is_empty() && !is_valid_email(email) {
            errors.push("Некорректный формат email".to_string());
        }
    }

    if let Some(phone) = data.phone.as_deref() {
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.push("Некорректный формат телефона".to_string());
        }
    }

    if let Some(day) = data.birthday_day {
        if !(1..=31).contains(&day) {
            errors.push("День рождения должен быть от 1 до 31".to_string());
        }
    }

    if let Some(month) = data.birthday_month {
        if !(1..=12).contains(&month) {
            errors.push("Месяц рождения должен быть от 1 до 12".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation { errors })
    }
}
