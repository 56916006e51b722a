use std::collections::BTreeMap;

use super::FormSchema;
use crate::models::{PaymentData, RegistrationData};
use crate::validation::{PaymentField, RegistrationField, Rule};

/// Registration step: name and street address.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm;

impl FormSchema for RegistrationForm {
    type Field = RegistrationField;
    type Output = RegistrationData;

    const FIELDS: &'static [RegistrationField] = &RegistrationField::ALL;

    fn key(field: RegistrationField) -> &'static str {
        field.key()
    }

    fn label(field: RegistrationField) -> &'static str {
        field.label()
    }

    fn rules(field: RegistrationField) -> &'static [Rule] {
        field.rules()
    }

    fn seed(
        saved: &RegistrationData,
        field: RegistrationField,
    ) -> String {
        match field {
            RegistrationField::Name => saved.name.clone(),
            RegistrationField::Address => saved.address.clone(),
        }
    }

    fn build(values: &BTreeMap<RegistrationField, String>) -> RegistrationData {
        let get = |field: RegistrationField| values.get(&field).cloned().unwrap_or_default();
        RegistrationData {
            name: get(RegistrationField::Name),
            address: get(RegistrationField::Address),
        }
    }
}

/// Payment step: cardholder name and card number.
#[derive(Debug, Clone, Copy)]
pub struct PaymentForm;

impl FormSchema for PaymentForm {
    type Field = PaymentField;
    type Output = PaymentData;

    const FIELDS: &'static [PaymentField] = &PaymentField::ALL;

    fn key(field: PaymentField) -> &'static str {
        field.key()
    }

    fn label(field: PaymentField) -> &'static str {
        field.label()
    }

    fn rules(field: PaymentField) -> &'static [Rule] {
        field.rules()
    }

    fn seed(
        saved: &PaymentData,
        field: PaymentField,
    ) -> String {
        match field {
            PaymentField::CardholderName => saved.cardholder_name.clone(),
            PaymentField::CardNumber => saved.card_number.clone(),
        }
    }

    fn build(values: &BTreeMap<PaymentField, String>) -> PaymentData {
        let get = |field: PaymentField| values.get(&field).cloned().unwrap_or_default();
        PaymentData {
            cardholder_name: get(PaymentField::CardholderName),
            card_number: get(PaymentField::CardNumber),
        }
    }
}
