use checkout_core::form::PaymentForm;
use checkout_core::{CheckoutStep, PaymentData, Transition, WizardState};

use super::{FormScreen, StepForm};

pub type PaymentScreen = FormScreen<PaymentForm>;

impl StepForm for PaymentForm {
    const STEP: CheckoutStep = CheckoutStep::Payment;
    const NEXT: CheckoutStep = CheckoutStep::Confirmation;
    const BACK: CheckoutStep = CheckoutStep::Registration;
    const HEADING: &'static str = "Payment";

    fn saved(state: &WizardState) -> Option<&PaymentData> {
        state.payment.as_ref()
    }

    fn commit(data: PaymentData) -> Transition {
        Transition::SetPayment(data)
    }
}
