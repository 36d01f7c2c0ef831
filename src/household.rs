//! Helpers for setting up a household: validation, initials, invite links.

use std::sync::LazyLock;

use regex::Regex;

const MIN_NAME_LEN: usize = 3;

/// Badge text for a household: `+` when the name is blank, otherwise the
/// first letter of the first one or two words.
pub fn household_initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    match (words.next(), words.next()) {
        (None, _) => "+".to_string(),
        (Some(first), None) => first.chars().take(1).collect(),
        (Some(first), Some(second)) => first.chars().take(1).chain(second.chars().take(1)).collect(),
    }
}

pub fn is_valid_household_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LEN
}

pub fn is_valid_member_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LEN
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Loose `local@domain.tld` check on the trimmed address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Link new members follow to join the household.
pub fn invite_url(base_url: &str, household_id: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{}/invite/{}", base, household_id)
}
