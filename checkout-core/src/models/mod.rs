mod product;
mod wizard_state;

pub use product::Product;
pub use wizard_state::{Cart, CheckoutStep, InvalidStep, PaymentData, RegistrationData, WizardState};
