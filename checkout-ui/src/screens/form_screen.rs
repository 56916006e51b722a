use std::fmt;

use checkout_core::{
    CheckoutStep, FormController, FormSchema, StoreError, Transition, WizardState, WizardStore,
};
use tracing::info;

use super::ScreenOutcome;

/// A form schema bound to its place in the wizard.
pub trait StepForm: FormSchema {
    const STEP: CheckoutStep;
    const NEXT: CheckoutStep;
    const BACK: CheckoutStep;
    const HEADING: &'static str;

    /// Data previously committed for this step.
    fn saved(state: &WizardState) -> Option<&Self::Output>;

    /// Transition that commits the validated data.
    fn commit(data: Self::Output) -> Transition;
}

/// A step screen made of one form and Back / Next buttons.
pub struct FormScreen<S: StepForm> {
    form: FormController<S>,
}

impl<S: StepForm> FormScreen<S> {
    /// Mounts the form seeded from the stored data for this step.
    pub fn mount(state: &WizardState) -> Self {
        Self {
            form: FormController::new(S::saved(state)),
        }
    }

    pub fn form(&self) -> &FormController<S> {
        &self.form
    }

    /// Edits `field` and validates it as if focus left the field.
    pub fn edit(
        &mut self,
        field: S::Field,
        value: impl Into<String>,
    ) -> Option<&'static str> {
        self.form.set_value(field, value);
        self.form.mark_touched_and_validate_field(field)
    }

    /// Validates every field; on success commits the data, advances
    /// `current_step` and navigates to the next step. On failure nothing is
    /// committed and every error becomes visible.
    pub async fn submit(
        &mut self,
        store: &mut WizardStore,
    ) -> Result<ScreenOutcome, StoreError> {
        let data = match self.form.validate_all() {
            Ok(data) => data,
            Err(failed) => {
                info!(
                    step = S::STEP.ordinal(),
                    errors = failed.errors.len(),
                    "form submission blocked"
                );
                return Ok(ScreenOutcome::Stay);
            }
        };
        store.dispatch(S::commit(data)).await?;
        store.set_step(S::NEXT).await?;
        Ok(ScreenOutcome::Navigate(S::NEXT))
    }

    /// Back never validates or commits.
    pub fn back(&self) -> ScreenOutcome {
        ScreenOutcome::Navigate(S::BACK)
    }

    pub(super) fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", S::HEADING)?;
        writeln!(f)?;
        for (field, state) in self.form.fields() {
            writeln!(f, "{}: {}", S::label(field), state.value)?;
            if let Some(message) = self.form.visible_error(field) {
                writeln!(f, "  ! {message}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "[Back] [Next]")
    }
}

impl<S: StepForm> fmt::Debug for FormScreen<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FormScreen")
            .field("step", &S::STEP)
            .field("form", &self.form)
            .finish()
    }
}
