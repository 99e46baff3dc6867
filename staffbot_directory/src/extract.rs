//! Entity extraction: candidate names and email addresses in raw text.

use std::sync::OnceLock;

static NAME_PAIR_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static SINGLE_TOKEN_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
static EMAIL_PATTERN: OnceLock<regex::Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn name_pair_pattern() -> &'static regex::Regex {
    NAME_PAIR_PATTERN.get_or_init(|| {
        regex::Regex::new(r"([А-ЯЁ][а-яё]+)\s+([А-ЯЁ][а-яё]+)")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn single_token_pattern() -> &'static regex::Regex {
    SINGLE_TOKEN_PATTERN.get_or_init(|| {
        regex::Regex::new(r"[А-ЯЁ][а-яё]+")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
pub(crate) fn email_pattern() -> &'static regex::Regex {
    EMAIL_PATTERN.get_or_init(|| {
        regex::Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// First pair of consecutive capitalized Cyrillic tokens, leftmost match.
/// No attempt is made to disambiguate multiple pairs.
#[must_use]
pub fn extract_name(text: &str) -> Option<(String, String)> {
    name_pair_pattern().captures(text).map(|caps| {
        (
            caps[1].to_string(),
            caps[2].to_string(),
        )
    })
}

/// First capitalized Cyrillic token. Used when a full name pair is absent.
#[must_use]
pub fn extract_capitalized_token(text: &str) -> Option<String> {
    single_token_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// First email-shaped substring, case preserved.
#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    email_pattern().find(text).map(|m| m.as_str().to_string())
}
