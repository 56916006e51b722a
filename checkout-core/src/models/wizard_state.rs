//! The wizard's single source of truth and its step guards.
//!
//! `WizardState` serializes to exactly the JSON object kept in the persisted
//! slot, e.g.
//!
//! ```json
//! {"cart":{"selectedProductId":1},"registration":null,"payment":null,"currentStep":1}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an integer does not name a checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid checkout step {0}; expected 0..=3")]
pub struct InvalidStep(pub u8);

/// One stage of the checkout sequence, ordered by its ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum CheckoutStep {
    #[default]
    Product = 0,
    Registration = 1,
    Payment = 2,
    Confirmation = 3,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 4] = [
        Self::Product,
        Self::Registration,
        Self::Payment,
        Self::Confirmation,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Title shown in the step indicator.
    pub fn title(self) -> &'static str {
        match self {
            Self::Product => "Select Products",
            Self::Registration => "Registration",
            Self::Payment => "Payment",
            Self::Confirmation => "Confirmation",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }
}

impl From<CheckoutStep> for u8 {
    fn from(step: CheckoutStep) -> Self {
        step.ordinal()
    }
}

impl TryFrom<u8> for CheckoutStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(value).ok_or(InvalidStep(value))
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub selected_product_id: Option<i64>,
}

/// Registration details; only ever stored fully populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub name: String,
    pub address: String,
}

impl RegistrationData {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Both fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty()
    }
}

/// Payment details; only ever stored fully populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub cardholder_name: String,
    pub card_number: String,
}

impl PaymentData {
    pub fn new(
        cardholder_name: impl Into<String>,
        card_number: impl Into<String>,
    ) -> Self {
        Self {
            cardholder_name: cardholder_name.into(),
            card_number: card_number.into(),
        }
    }

    /// Both fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.cardholder_name.is_empty() && !self.card_number.is_empty()
    }
}

/// Everything the wizard knows about the purchase in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub cart: Cart,
    pub registration: Option<RegistrationData>,
    pub payment: Option<PaymentData>,
    pub current_step: CheckoutStep,
}

impl WizardState {
    /// Whether the user may enter `step`.
    ///
    /// Each step requires its own prerequisite and every earlier step's, so
    /// the answer is monotonic in the step ordinal:
    /// - `Product`: always
    /// - `Registration`: a product is selected
    /// - `Payment`: registration name and address are non-empty
    /// - `Confirmation`: cardholder name and card number are non-empty
    ///
    /// The cumulative check means selecting a product can unlock `Payment`
    /// too, when registration was stored without a product (possible through
    /// [`WizardState::apply`] or the store, not through the screens). A
    /// per-step check would leave `Payment` untouched there but would let a
    /// later step open while an earlier one is locked.
    pub fn can_access_step(
        &self,
        step: CheckoutStep,
    ) -> bool {
        CheckoutStep::ALL
            .iter()
            .take_while(|s| **s <= step)
            .all(|s| self.prerequisite_met(*s))
    }

    /// The furthest step the guard currently allows.
    pub fn highest_accessible_step(&self) -> CheckoutStep {
        CheckoutStep::ALL
            .iter()
            .copied()
            .take_while(|s| self.prerequisite_met(*s))
            .last()
            .unwrap_or_default()
    }

    /// Where a screen for `step` must send the user instead of rendering,
    /// or `None` when every prerequisite holds.
    ///
    /// The target is the earliest step whose output is missing, i.e. the
    /// step that produces the first unmet prerequisite.
    pub fn redirect_target(
        &self,
        step: CheckoutStep,
    ) -> Option<CheckoutStep> {
        if self.can_access_step(step) {
            None
        } else {
            Some(self.highest_accessible_step())
        }
    }

    fn prerequisite_met(
        &self,
        step: CheckoutStep,
    ) -> bool {
        match step {
            CheckoutStep::Product => true,
            CheckoutStep::Registration => self.cart.selected_product_id.is_some(),
            CheckoutStep::Payment => self
                .registration
                .as_ref()
                .is_some_and(RegistrationData::is_complete),
            CheckoutStep::Confirmation => {
                self.payment.as_ref().is_some_and(PaymentData::is_complete)
            }
        }
    }
}
