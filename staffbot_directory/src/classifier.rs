//! Admission gate: decides whether a message can be about employees at all.
//!
//! This check is pure, cheap and MUST run before any entity extraction or
//! store access. Everything it rejects goes straight to the conversational
//! fallback.

use crate::extract::email_pattern;
use std::sync::OnceLock;

/// Keywords that mark a message as employee-related. Matched on the
/// case-folded text with plain substring semantics, so the truncated stems
/// ("должност", "день рождени") also catch inflected forms.
const DIRECTORY_KEYWORDS: &[&str] = &[
    "сотрудник",
    "сотрудница",
    "директор",
    "руководитель",
    "бухгалтер",
    "главбух",
    "главный бухгалтер",
    "отдел",
    "подразделение",
    "бухгалтерия",
    "должность",
    "должност",
    "почта",
    "email",
    "e-mail",
    "мейл",
    "телефон",
    "контакт",
    "день рождения",
    "день рождени",
    "др",
];

static BARE_NAME_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static POSITION_QUESTION_PATTERNS: OnceLock<Vec<regex::Regex>> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn bare_name_pattern() -> &'static regex::Regex {
    BARE_NAME_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[А-ЯЁ][а-яё]+(?:\s+[А-ЯЁ][а-яё]+)+$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex patterns validated at compile time"
)]
pub(crate) fn position_question_patterns() -> &'static [regex::Regex] {
    POSITION_QUESTION_PATTERNS.get_or_init(|| {
        [
            r"(?i)кто\s+(по\s+)?должности",
            r"(?i)какая\s+должность",
            r"(?i)чь[аяё]\s+должность",
            r"(?i)должность\s+\w+",
        ]
        .iter()
        .map(|p| regex::Regex::new(p).expect("Static regex pattern is guaranteed to be valid"))
        .collect()
    })
}

/// Returns true when the text is in scope for directory resolution.
///
/// Admission criteria, any of which suffices:
/// 1. a fixed employee/contact/structure keyword appears in the folded text;
/// 2. an email-shaped substring is present;
/// 3. the trimmed text is not a command, is under 100 characters, and is a
///    bare "Имя Фамилия" proper-name phrase;
/// 4. one of the fixed "whose position" phrasings matches.
#[must_use]
pub fn is_directory_query(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }

    let low = text.to_lowercase();
    let low = low.trim();

    if DIRECTORY_KEYWORDS.iter().any(|kw| low.contains(kw)) {
        return true;
    }

    if email_pattern().is_match(text) {
        return true;
    }

    if !text.starts_with('/')
        && text.chars().count() < 100
        && bare_name_pattern().is_match(text.trim())
    {
        return true;
    }

    position_question_patterns().iter().any(|p| p.is_match(text))
}
