use checkout_core::form::RegistrationForm;
use checkout_core::{CheckoutStep, RegistrationData, Transition, WizardState};

use super::{FormScreen, StepForm};

pub type RegistrationScreen = FormScreen<RegistrationForm>;

impl StepForm for RegistrationForm {
    const STEP: CheckoutStep = CheckoutStep::Registration;
    const NEXT: CheckoutStep = CheckoutStep::Payment;
    const BACK: CheckoutStep = CheckoutStep::Product;
    const HEADING: &'static str = "Registration";

    fn saved(state: &WizardState) -> Option<&RegistrationData> {
        state.registration.as_ref()
    }

    fn commit(data: RegistrationData) -> Transition {
        Transition::SetRegistration(data)
    }
}
