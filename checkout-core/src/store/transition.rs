use crate::models::{Cart, CheckoutStep, PaymentData, RegistrationData, WizardState};

/// Every way the wizard state may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SelectProduct(i64),
    SetRegistration(RegistrationData),
    SetPayment(PaymentData),
    SetStep(CheckoutStep),
    Reset,
}

impl Transition {
    /// Name used in logs. Payloads stay out of logs: they carry card data.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectProduct(_) => "select_product",
            Self::SetRegistration(_) => "set_registration",
            Self::SetPayment(_) => "set_payment",
            Self::SetStep(_) => "set_step",
            Self::Reset => "reset_wizard",
        }
    }
}

impl WizardState {
    /// Pure reducer: the state after `transition`.
    pub fn apply(
        self,
        transition: Transition,
    ) -> WizardState {
        match transition {
            Transition::SelectProduct(product_id) => WizardState {
                cart: Cart {
                    selected_product_id: Some(product_id),
                },
                ..self
            },
            Transition::SetRegistration(data) => WizardState {
                registration: Some(data),
                ..self
            },
            Transition::SetPayment(data) => WizardState {
                payment: Some(data),
                ..self
            },
            Transition::SetStep(step) => WizardState {
                current_step: step,
                ..self
            },
            Transition::Reset => WizardState::default(),
        }
    }
}
