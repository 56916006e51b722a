//! Pure predicates used by the rule tables.

use std::sync::LazyLock;

use regex::Regex;

use super::card::strip_whitespace;

static LETTERS_AND_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z ]+$").expect("letters-and-spaces pattern is valid")
});

/// The raw value is non-empty. Whitespace-only values pass; the length
/// rules that follow reject them.
pub fn required(value: &str) -> bool {
    !value.is_empty()
}

/// At least `N` characters remain after trimming surrounding whitespace.
pub fn min_trimmed_chars<const N: usize>(value: &str) -> bool {
    value.trim().chars().count() >= N
}

/// Only ASCII letters and plain spaces, and at least one of them.
pub fn letters_and_spaces(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value)
}

/// After removing whitespace, one or more ASCII digits and nothing else.
pub fn digits_ignoring_whitespace(value: &str) -> bool {
    let stripped = strip_whitespace(value);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Exactly `N` characters once whitespace is removed.
pub fn stripped_len_is<const N: usize>(value: &str) -> bool {
    strip_whitespace(value).chars().count() == N
}
