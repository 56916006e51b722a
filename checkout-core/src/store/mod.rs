//! The wizard state store.
//!
//! [`WizardStore`] owns the current [`WizardState`] and the storage that
//! mirrors it. It is created once at startup, handed to screens by `&mut`,
//! and dropped at exit. Every transition goes through
//! [`WizardStore::dispatch`], which applies the pure reducer and then writes
//! the full snapshot before returning, so the slot never lags behind memory.

mod transition;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{CheckoutStep, PaymentData, RegistrationData, WizardState};
use crate::storage::{StateStorage, StorageError};

pub use transition::Transition;

/// Key of the slot holding the serialized wizard state.
pub const STORAGE_KEY: &str = "checkout_wizard_state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist wizard state: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to encode wizard state: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct WizardStore {
    state: WizardState,
    storage: Box<dyn StateStorage>,
}

impl WizardStore {
    /// Creates the store, rehydrating from `storage` once.
    ///
    /// A missing slot yields the default state. An unreadable or corrupt
    /// slot is logged and also yields the default state; it never fails
    /// startup. A saved step past its prerequisites is lowered and the
    /// lowered state written back, so the slot matches memory from the start.
    pub async fn open(storage: Box<dyn StateStorage>) -> Self {
        let (state, clamped) = rehydrate(storage.as_ref()).await;
        let store = Self { state, storage };
        if clamped {
            if let Err(error) = store.persist().await {
                error!(%error, "failed to write back clamped wizard state");
            }
        }
        store
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(&self.state)?;
        self.storage.save(STORAGE_KEY, &snapshot).await?;
        debug!(bytes = snapshot.len(), "wizard state persisted");
        Ok(())
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> CheckoutStep {
        self.state.current_step
    }

    pub fn can_access_step(
        &self,
        step: CheckoutStep,
    ) -> bool {
        self.state.can_access_step(step)
    }

    /// Applies `transition`, persists the result, and returns the new state.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the snapshot cannot be written. The
    /// in-memory state has already changed by then and keeps the change.
    pub async fn dispatch(
        &mut self,
        transition: Transition,
    ) -> Result<&WizardState, StoreError> {
        let name = transition.name();
        let is_reset = matches!(transition, Transition::Reset);
        self.state = std::mem::take(&mut self.state).apply(transition);
        info!(
            transition = name,
            step = self.state.current_step.ordinal(),
            "wizard state changed"
        );

        if is_reset {
            self.storage.remove(STORAGE_KEY).await?;
            debug!("persisted wizard state cleared");
        } else {
            self.persist().await?;
        }

        Ok(&self.state)
    }

    pub async fn select_product(
        &mut self,
        product_id: i64,
    ) -> Result<&WizardState, StoreError> {
        self.dispatch(Transition::SelectProduct(product_id)).await
    }

    pub async fn set_registration(
        &mut self,
        data: RegistrationData,
    ) -> Result<&WizardState, StoreError> {
        self.dispatch(Transition::SetRegistration(data)).await
    }

    pub async fn set_payment(
        &mut self,
        data: PaymentData,
    ) -> Result<&WizardState, StoreError> {
        self.dispatch(Transition::SetPayment(data)).await
    }

    /// Moves `current_step` directly. Callers validate the step being left
    /// first; a step the guard refuses is still applied, but logged.
    pub async fn set_step(
        &mut self,
        step: CheckoutStep,
    ) -> Result<&WizardState, StoreError> {
        if !self.state.can_access_step(step) {
            warn!(
                step = step.ordinal(),
                "setting a step whose prerequisites are not met"
            );
        }
        self.dispatch(Transition::SetStep(step)).await
    }

    /// Restores defaults and deletes the persisted slot.
    pub async fn reset_wizard(&mut self) -> Result<&WizardState, StoreError> {
        self.dispatch(Transition::Reset).await
    }

    /// Tears the store down, handing back its storage.
    pub fn into_storage(self) -> Box<dyn StateStorage> {
        self.storage
    }
}

/// Returns the rehydrated state and whether its step had to be lowered.
async fn rehydrate(storage: &dyn StateStorage) -> (WizardState, bool) {
    let raw = match storage.load(STORAGE_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no persisted wizard state; starting fresh");
            return (WizardState::default(), false);
        }
        Err(error) => {
            error!(%error, "failed to read persisted wizard state");
            return (WizardState::default(), false);
        }
    };

    let mut state: WizardState = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(error) => {
            error!(%error, "failed to parse persisted wizard state");
            return (WizardState::default(), false);
        }
    };

    let highest = state.highest_accessible_step();
    let clamped = state.current_step > highest;
    if clamped {
        warn!(
            saved = state.current_step.ordinal(),
            clamped = highest.ordinal(),
            "persisted step exceeds its prerequisites"
        );
        state.current_step = highest;
    }

    info!(step = state.current_step.ordinal(), "wizard state rehydrated");
    (state, clamped)
}
