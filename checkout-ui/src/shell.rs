//! Routes and the step indicator shown above every screen.

use std::fmt;

use checkout_core::{CheckoutStep, WizardState};
use tracing::info;

const CHECKOUT_PREFIX: &str = "/checkout";

/// Path of the screen for `step`.
pub fn path_for(step: CheckoutStep) -> &'static str {
    match step {
        CheckoutStep::Product => "/checkout/products",
        CheckoutStep::Registration => "/checkout/registration",
        CheckoutStep::Payment => "/checkout/payment",
        CheckoutStep::Confirmation => "/checkout/order",
    }
}

/// Resolves a path to a step.
///
/// `/` redirects to the first step, as does any unknown path under
/// `/checkout`. Paths outside the namespace are not found (`None`).
pub fn resolve(path: &str) -> Option<CheckoutStep> {
    let path = path.trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some(CheckoutStep::Product);
    }
    if let Some(step) = CheckoutStep::ALL
        .into_iter()
        .find(|s| path_for(*s) == trimmed)
    {
        return Some(step);
    }
    let in_namespace = trimmed == CHECKOUT_PREFIX
        || trimmed
            .strip_prefix(CHECKOUT_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'));
    in_namespace.then_some(CheckoutStep::Product)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStatus {
    Active,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: CheckoutStep,
    pub status: IndicatorStatus,
    pub clickable: bool,
}

impl fmt::Display for StepIndicator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mark = match self.status {
            IndicatorStatus::Active => '>',
            IndicatorStatus::Completed => 'x',
            IndicatorStatus::Pending => ' ',
        };
        write!(
            f,
            "[{mark}] {} {}",
            self.step.ordinal() + 1,
            self.step.title()
        )
    }
}

/// Tracks the active route and the one-time restore of the saved step.
#[derive(Debug, Default)]
pub struct NavigationShell {
    active: CheckoutStep,
    restored: bool,
}

impl NavigationShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> CheckoutStep {
        self.active
    }

    pub fn active_path(&self) -> &'static str {
        path_for(self.active)
    }

    pub fn set_active(
        &mut self,
        step: CheckoutStep,
    ) {
        if step != self.active {
            info!(from = path_for(self.active), to = path_for(step), "navigated");
        }
        self.active = step;
    }

    /// On the first call only: the saved step to reopen when it is past the
    /// first step and differs from the active one.
    pub fn restore_saved_step(
        &mut self,
        state: &WizardState,
    ) -> Option<CheckoutStep> {
        if std::mem::replace(&mut self.restored, true) {
            return None;
        }
        let saved = state.current_step;
        (saved > CheckoutStep::Product && saved != self.active).then_some(saved)
    }

    pub fn indicators(
        &self,
        state: &WizardState,
    ) -> Vec<StepIndicator> {
        CheckoutStep::ALL
            .into_iter()
            .map(|step| {
                let status = if step == self.active {
                    IndicatorStatus::Active
                } else if step < self.active {
                    IndicatorStatus::Completed
                } else {
                    IndicatorStatus::Pending
                };
                StepIndicator {
                    step,
                    status,
                    clickable: step <= state.current_step && step != self.active,
                }
            })
            .collect()
    }

    /// The step to open when its indicator is clicked, if clickable.
    /// Later data is left untouched.
    pub fn click(
        &self,
        step: CheckoutStep,
        state: &WizardState,
    ) -> Option<CheckoutStep> {
        self.indicators(state)
            .into_iter()
            .find(|i| i.step == step)
            .filter(|i| i.clickable)
            .map(|i| i.step)
    }
}
