//! Field-level form state shared by every step that collects input.
//!
//! A [`FormController`] is parameterized by a [`FormSchema`], which names the
//! fields, supplies each field's rule table, and converts between raw field
//! values and the step's data type. Screens create a controller when they
//! mount, feed it edits and blur events, and call
//! [`FormController::validate_all`] as the only gate before committing.

mod schemas;

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::validation::{FieldError, Rule, ValidationFailed, first_violation};

pub use schemas::{PaymentForm, RegistrationForm};

/// Describes one step's form.
pub trait FormSchema {
    type Field: Copy + Ord + fmt::Debug + 'static;
    /// Fully populated data produced by a successful submit.
    type Output;

    /// Every field, in display and error-report order.
    const FIELDS: &'static [Self::Field];

    fn key(field: Self::Field) -> &'static str;
    fn label(field: Self::Field) -> &'static str;
    fn rules(field: Self::Field) -> &'static [Rule];

    /// Raw value of `field` taken from previously saved data.
    fn seed(
        saved: &Self::Output,
        field: Self::Field,
    ) -> String;

    /// Builds the step data from raw values. Only called once every field
    /// passed its rules.
    fn build(values: &BTreeMap<Self::Field, String>) -> Self::Output;

    /// Looks a field up by key or label, ignoring ASCII case.
    fn field_named(name: &str) -> Option<Self::Field> {
        Self::FIELDS.iter().copied().find(|f| {
            Self::key(*f).eq_ignore_ascii_case(name) || Self::label(*f).eq_ignore_ascii_case(name)
        })
    }
}

/// Value, error and touched flag of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub error: Option<&'static str>,
    pub touched: bool,
}

pub struct FormController<S: FormSchema> {
    fields: BTreeMap<S::Field, FieldState>,
    initial: BTreeMap<S::Field, String>,
    _schema: PhantomData<S>,
}

impl<S: FormSchema> FormController<S> {
    /// Creates a form seeded from `saved`, or with empty values.
    pub fn new(saved: Option<&S::Output>) -> Self {
        let initial = seed_values::<S>(saved);
        let fields = initial
            .iter()
            .map(|(field, value)| {
                (
                    *field,
                    FieldState {
                        value: value.clone(),
                        ..Default::default()
                    },
                )
            })
            .collect();

        Self {
            fields,
            initial,
            _schema: PhantomData,
        }
    }

    /// Updates a value. Any error already shown for the field stays until
    /// the next validation pass.
    pub fn set_value(
        &mut self,
        field: S::Field,
        value: impl Into<String>,
    ) {
        self.state_mut(field).value = value.into();
    }

    /// Blur handling: validates `field` alone, marks it touched, and records
    /// or clears its error. Returns the error now attached to the field.
    pub fn mark_touched_and_validate_field(
        &mut self,
        field: S::Field,
    ) -> Option<&'static str> {
        let state = self.state_mut(field);
        state.touched = true;
        state.error = first_violation(S::rules(field), &state.value);
        if let Some(message) = state.error {
            debug!(field = S::key(field), message, "field failed validation");
        }
        state.error
    }

    /// Runs every field's rules and collects all failures.
    ///
    /// On failure every field is marked touched and the violating fields
    /// carry their messages. On success all errors are cleared and the step
    /// data is returned.
    pub fn validate_all(&mut self) -> Result<S::Output, ValidationFailed> {
        let mut errors = Vec::new();
        for field in S::FIELDS {
            let state = self.state_mut(*field);
            state.error = first_violation(S::rules(*field), &state.value);
            if let Some(message) = state.error {
                errors.push(FieldError {
                    field: S::key(*field),
                    message,
                });
            }
        }

        if errors.is_empty() {
            let values: BTreeMap<_, _> = self
                .fields
                .iter()
                .map(|(field, state)| (*field, state.value.clone()))
                .collect();
            return Ok(S::build(&values));
        }

        for state in self.fields.values_mut() {
            state.touched = true;
        }
        debug!(count = errors.len(), "form submission blocked");
        Err(ValidationFailed { errors })
    }

    /// Replaces every value with `saved` (or the values this form was
    /// created with) and clears errors and touched flags.
    pub fn reset(
        &mut self,
        saved: Option<&S::Output>,
    ) {
        let values = match saved {
            Some(_) => seed_values::<S>(saved),
            None => self.initial.clone(),
        };
        for (field, value) in values {
            *self.state_mut(field) = FieldState {
                value,
                ..Default::default()
            };
        }
    }

    pub fn value(
        &self,
        field: S::Field,
    ) -> &str {
        self.fields
            .get(&field)
            .map(|s| s.value.as_str())
            .unwrap_or_default()
    }

    pub fn error(
        &self,
        field: S::Field,
    ) -> Option<&'static str> {
        self.fields.get(&field).and_then(|s| s.error)
    }

    pub fn is_touched(
        &self,
        field: S::Field,
    ) -> bool {
        self.fields.get(&field).is_some_and(|s| s.touched)
    }

    /// The error a screen should display: only once the field is touched.
    pub fn visible_error(
        &self,
        field: S::Field,
    ) -> Option<&'static str> {
        self.fields
            .get(&field)
            .filter(|s| s.touched)
            .and_then(|s| s.error)
    }

    /// Field states in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (S::Field, &FieldState)> {
        S::FIELDS
            .iter()
            .filter_map(|f| self.fields.get(f).map(|state| (*f, state)))
    }

    fn state_mut(
        &mut self,
        field: S::Field,
    ) -> &mut FieldState {
        self.fields.entry(field).or_default()
    }
}

impl<S: FormSchema> Default for FormController<S> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<S: FormSchema> fmt::Debug for FormController<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FormController")
            .field("fields", &self.fields)
            .finish()
    }
}

fn seed_values<S: FormSchema>(saved: Option<&S::Output>) -> BTreeMap<S::Field, String> {
    S::FIELDS
        .iter()
        .map(|field| {
            let value = saved.map(|s| S::seed(s, *field)).unwrap_or_default();
            (*field, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{PaymentData, RegistrationData};
    use crate::validation::{PaymentField, RegistrationField};

    #[test]
    fn new_form_without_saved_data_is_blank_and_untouched() {
        let form = FormController::<RegistrationForm>::new(None);

        for (_, state) in form.fields() {
            assert_eq!(state, &FieldState::default());
        }
    }

    #[test]
    fn new_form_is_seeded_from_saved_data() {
        let saved = RegistrationData::new("John Doe", "123 Main Street");
        let form = FormController::<RegistrationForm>::new(Some(&saved));

        assert_eq!(form.value(RegistrationField::Name), "John Doe");
        assert_eq!(form.value(RegistrationField::Address), "123 Main Street");
    }

    #[test]
    fn validate_all_on_empty_registration_reports_both_fields() {
        let mut form = FormController::<RegistrationForm>::default();

        let failed = form.validate_all().unwrap_err();

        assert_eq!(
            failed.messages(),
            vec!["Name is required", "Address is required"]
        );
        assert!(form.is_touched(RegistrationField::Name));
        assert!(form.is_touched(RegistrationField::Address));
        assert_eq!(
            form.visible_error(RegistrationField::Address),
            Some("Address is required")
        );
    }

    #[test]
    fn short_name_fails_after_blur_and_on_submit() {
        let mut form = FormController::<RegistrationForm>::default();
        form.set_value(RegistrationField::Name, "A");

        assert_eq!(form.visible_error(RegistrationField::Name), None);
        assert_eq!(
            form.mark_touched_and_validate_field(RegistrationField::Name),
            Some("Name must be at least 2 characters")
        );

        form.set_value(RegistrationField::Address, "123 Main Street");
        let failed = form.validate_all().unwrap_err();
        assert_eq!(
            failed.message_for("name"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(failed.message_for("address"), None);
    }

    #[test]
    fn blur_only_validates_the_blurred_field() {
        let mut form = FormController::<RegistrationForm>::default();

        form.mark_touched_and_validate_field(RegistrationField::Name);

        assert!(form.is_touched(RegistrationField::Name));
        assert!(!form.is_touched(RegistrationField::Address));
        assert_eq!(form.error(RegistrationField::Address), None);
    }

    #[test]
    fn set_value_keeps_the_previous_error() {
        let mut form = FormController::<RegistrationForm>::default();
        form.mark_touched_and_validate_field(RegistrationField::Name);

        form.set_value(RegistrationField::Name, "John Doe");

        assert_eq!(
            form.visible_error(RegistrationField::Name),
            Some("Name is required")
        );
        assert_eq!(
            form.mark_touched_and_validate_field(RegistrationField::Name),
            None
        );
    }

    #[test]
    fn successful_submit_clears_errors_and_builds_data() {
        let mut form = FormController::<PaymentForm>::default();
        form.mark_touched_and_validate_field(PaymentField::CardNumber);
        form.set_value(PaymentField::CardholderName, "JOHN DOE");
        form.set_value(PaymentField::CardNumber, "4242424242424242");

        let data = form.validate_all().unwrap();

        assert_eq!(data, PaymentData::new("JOHN DOE", "4242424242424242"));
        assert_eq!(form.error(PaymentField::CardNumber), None);
    }

    #[test]
    fn payment_errors_surface_together() {
        let mut form = FormController::<PaymentForm>::default();
        form.set_value(PaymentField::CardholderName, "John123");
        form.set_value(PaymentField::CardNumber, "123456789012");

        let failed = form.validate_all().unwrap_err();

        assert_eq!(
            failed.messages(),
            vec![
                "Cardholder name can only contain letters and spaces",
                "Card number must be 16 digits",
            ]
        );
    }

    #[test]
    fn reset_restores_initial_values_and_clears_flags() {
        let saved = RegistrationData::new("John Doe", "123 Main Street");
        let mut form = FormController::<RegistrationForm>::new(Some(&saved));
        form.set_value(RegistrationField::Name, "");
        let _ = form.validate_all();

        form.reset(None);

        assert_eq!(form.value(RegistrationField::Name), "John Doe");
        assert!(!form.is_touched(RegistrationField::Name));
        assert_eq!(form.error(RegistrationField::Name), None);
    }

    #[test]
    fn reset_with_snapshot_replaces_values() {
        let mut form = FormController::<RegistrationForm>::default();

        form.reset(Some(&RegistrationData::new("Jane Roe", "9 Elm Avenue")));

        assert_eq!(form.value(RegistrationField::Name), "Jane Roe");
        assert_eq!(form.value(RegistrationField::Address), "9 Elm Avenue");
    }

    #[test]
    fn fields_are_found_by_key_or_label() {
        assert_eq!(
            PaymentForm::field_named("cardnumber"),
            Some(PaymentField::CardNumber)
        );
        assert_eq!(
            PaymentForm::field_named("Cardholder Name"),
            Some(PaymentField::CardholderName)
        );
        assert_eq!(RegistrationForm::field_named("zip"), None);
    }
}
