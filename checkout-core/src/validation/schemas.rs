use std::fmt;

use super::{Rule, rules};

static NAME_RULES: [Rule; 2] = [
    Rule::new(rules::required, "Name is required"),
    Rule::new(
        rules::min_trimmed_chars::<2>,
        "Name must be at least 2 characters",
    ),
];

static ADDRESS_RULES: [Rule; 2] = [
    Rule::new(rules::required, "Address is required"),
    Rule::new(
        rules::min_trimmed_chars::<5>,
        "Address must be at least 5 characters",
    ),
];

static CARDHOLDER_NAME_RULES: [Rule; 3] = [
    Rule::new(rules::required, "Cardholder name is required"),
    Rule::new(
        rules::min_trimmed_chars::<2>,
        "Cardholder name must be at least 2 characters",
    ),
    Rule::new(
        rules::letters_and_spaces,
        "Cardholder name can only contain letters and spaces",
    ),
];

static CARD_NUMBER_RULES: [Rule; 3] = [
    Rule::new(rules::required, "Card number is required"),
    Rule::new(
        rules::digits_ignoring_whitespace,
        "Card number can only contain digits",
    ),
    Rule::new(rules::stripped_len_is::<16>, "Card number must be 16 digits"),
];

/// Fields of the registration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    Name,
    Address,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 2] = [Self::Name, Self::Address];

    /// Key used in persisted data and error reports.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Address => "Street Address",
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            Self::Name => &NAME_RULES,
            Self::Address => &ADDRESS_RULES,
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fields of the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentField {
    CardholderName,
    CardNumber,
}

impl PaymentField {
    pub const ALL: [PaymentField; 2] = [Self::CardholderName, Self::CardNumber];

    pub fn key(self) -> &'static str {
        match self {
            Self::CardholderName => "cardholderName",
            Self::CardNumber => "cardNumber",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CardholderName => "Cardholder Name",
            Self::CardNumber => "Credit Card Number",
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            Self::CardholderName => &CARDHOLDER_NAME_RULES,
            Self::CardNumber => &CARD_NUMBER_RULES,
        }
    }
}

impl fmt::Display for PaymentField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}
