//! The four checkout step screens.
//!
//! Each screen is a headless view model: it owns its local UI state (form
//! fields, loading and pending flags), reads the wizard state through the
//! store, and reports where to go next as a [`ScreenOutcome`]. Rendering is a
//! `Display` impl so any front end can show it.

mod confirmation;
mod form_screen;
mod payment;
mod product;
mod registration;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use checkout_core::{CheckoutStep, WizardState};

pub use confirmation::{ConfirmationScreen, PurchaseStatus};
pub use form_screen::{FormScreen, StepForm};
pub use payment::PaymentScreen;
pub use product::{CatalogLoad, ProductScreen};
pub use registration::RegistrationScreen;

/// Liveness flag owned by a mounted screen.
///
/// Async work started by the screen carries a [`ScopeToken`]. Dropping the
/// scope (unmounting the screen) marks every token dead, and results that
/// arrive afterwards are discarded.
#[derive(Debug)]
pub struct MountScope {
    live: Arc<AtomicBool>,
}

impl MountScope {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            live: Arc::clone(&self.live),
        }
    }

    /// Whether `token` was issued by this scope and the scope is still live.
    pub fn accepts(
        &self,
        token: &ScopeToken,
    ) -> bool {
        Arc::ptr_eq(&self.live, &token.live) && token.is_live()
    }
}

impl Default for MountScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MountScope {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct ScopeToken {
    live: Arc<AtomicBool>,
}

impl ScopeToken {
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// What a screen asks the shell to do after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    Stay,
    Navigate(CheckoutStep),
}

/// The mounted screen.
#[derive(Debug)]
pub enum ActiveScreen {
    Product(ProductScreen),
    Registration(RegistrationScreen),
    Payment(PaymentScreen),
    Confirmation(ConfirmationScreen),
}

impl ActiveScreen {
    /// Mounts the screen for `step`, or returns the step to redirect to when
    /// a prerequisite is unmet.
    pub fn mount(
        step: CheckoutStep,
        state: &WizardState,
    ) -> Result<Self, CheckoutStep> {
        if let Some(target) = state.redirect_target(step) {
            return Err(target);
        }
        Ok(match step {
            CheckoutStep::Product => Self::Product(ProductScreen::new()),
            CheckoutStep::Registration => Self::Registration(RegistrationScreen::mount(state)),
            CheckoutStep::Payment => Self::Payment(PaymentScreen::mount(state)),
            CheckoutStep::Confirmation => Self::Confirmation(ConfirmationScreen::new()),
        })
    }

    pub fn step(&self) -> CheckoutStep {
        match self {
            Self::Product(_) => CheckoutStep::Product,
            Self::Registration(_) => CheckoutStep::Registration,
            Self::Payment(_) => CheckoutStep::Payment,
            Self::Confirmation(_) => CheckoutStep::Confirmation,
        }
    }

    /// Binds the screen to the wizard state for rendering.
    pub fn view<'a>(
        &'a self,
        state: &'a WizardState,
    ) -> ScreenView<'a> {
        ScreenView {
            screen: self,
            state,
        }
    }
}

pub struct ScreenView<'a> {
    screen: &'a ActiveScreen,
    state: &'a WizardState,
}

impl fmt::Display for ScreenView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.screen {
            ActiveScreen::Product(s) => s.render(f, self.state),
            ActiveScreen::Registration(s) => s.render(f),
            ActiveScreen::Payment(s) => s.render(f),
            ActiveScreen::Confirmation(s) => s.render(f, self.state),
        }
    }
}
