//! Field validation rules and the per-step rule tables.
//!
//! A [`Rule`] is a predicate over a single field value paired with the
//! message shown when it does not hold. A field's rules run in table order
//! and stop at the first violation; fields never affect one another.

pub mod card;
pub mod rules;
mod schemas;

use std::fmt;

use thiserror::Error;

pub use schemas::{PaymentField, RegistrationField};

/// Predicate over a raw field value. `true` means the value passes.
pub type Check = fn(&str) -> bool;

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(
        check: Check,
        message: &'static str,
    ) -> Self {
        Self { check, message }
    }
}

/// Runs `rules` in order and returns the message of the first one that
/// `value` violates.
pub fn first_violation(
    rules: &[Rule],
    value: &str,
) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| !(rule.check)(value))
        .map(|rule| rule.message)
}

/// A single field's failure, as reported by whole-form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Whole-form validation failed. Holds every violating field, in the
/// schema's field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationFailed {
    pub errors: Vec<FieldError>,
}

impl ValidationFailed {
    pub fn messages(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.message).collect()
    }

    pub fn message_for(
        &self,
        field: &str,
    ) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: [Rule; 2] = [
        Rule::new(rules::required, "required"),
        Rule::new(rules::min_trimmed_chars::<3>, "too short"),
    ];

    #[test]
    fn first_violation_stops_at_the_first_failing_rule() {
        assert_eq!(first_violation(&RULES, ""), Some("required"));
        assert_eq!(first_violation(&RULES, "ab"), Some("too short"));
        assert_eq!(first_violation(&RULES, "abc"), None);
    }

    #[test]
    fn empty_rule_list_accepts_anything() {
        assert_eq!(first_violation(&[], ""), None);
    }
}
