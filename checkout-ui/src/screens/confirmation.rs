use std::fmt;
use std::sync::Arc;

use checkout_core::validation::card::mask_card_number;
use checkout_core::{
    CheckoutStep, PurchaseOutcome, PurchaseService, ServiceError, StoreError, WizardState,
    WizardStore,
};
use tracing::{debug, info, warn};

use super::{MountScope, ScopeToken, ScreenOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseStatus {
    Idle,
    Pending,
    Failed(String),
    Succeeded,
}

#[derive(Debug)]
pub struct ConfirmationScreen {
    scope: MountScope,
    status: PurchaseStatus,
}

impl ConfirmationScreen {
    pub fn new() -> Self {
        Self {
            scope: MountScope::new(),
            status: PurchaseStatus::Idle,
        }
    }

    pub fn status(&self) -> &PurchaseStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == PurchaseStatus::Pending
    }

    /// Starts a purchase and returns the token its result must carry.
    ///
    /// Refused (`None`) while a purchase is pending, after it succeeded, or
    /// when registration or payment data is missing. Starting clears any
    /// previous error.
    pub fn begin_purchase(
        &mut self,
        state: &WizardState,
    ) -> Option<ScopeToken> {
        match self.status {
            PurchaseStatus::Pending => {
                debug!("purchase already pending; confirm refused");
                return None;
            }
            PurchaseStatus::Succeeded => return None,
            PurchaseStatus::Idle | PurchaseStatus::Failed(_) => {}
        }
        if state.registration.is_none() || state.payment.is_none() {
            return None;
        }
        info!("purchase submitted");
        self.status = PurchaseStatus::Pending;
        Some(self.scope.token())
    }

    /// Submits the purchase on behalf of the mount that issued `token`.
    /// Returns `None` when that mount is gone by the time the call resolves.
    pub async fn submit(
        token: ScopeToken,
        purchases: Arc<dyn PurchaseService>,
    ) -> Option<Result<PurchaseOutcome, ServiceError>> {
        let result = purchases.submit_purchase().await;
        if token.is_live() {
            Some(result)
        } else {
            debug!("purchase result dropped; screen unmounted");
            None
        }
    }

    /// Applies a purchase result. Success resets the wizard; failure keeps
    /// every piece of state and shows the error for a retry. Returns `false`
    /// when the result belongs to another mount.
    pub async fn finish_purchase(
        &mut self,
        token: &ScopeToken,
        result: Result<PurchaseOutcome, ServiceError>,
        store: &mut WizardStore,
    ) -> Result<bool, StoreError> {
        if !self.scope.accepts(token) {
            debug!("ignoring stale purchase result");
            return Ok(false);
        }
        match result {
            Ok(PurchaseOutcome::Success) => {
                info!("purchase completed");
                self.status = PurchaseStatus::Succeeded;
                store.reset_wizard().await?;
            }
            Err(error) => {
                warn!(%error, "purchase failed");
                self.status = PurchaseStatus::Failed(error.to_string());
            }
        }
        Ok(true)
    }

    /// Back is disabled while a purchase is pending and gone after success.
    pub fn back(&self) -> ScreenOutcome {
        match self.status {
            PurchaseStatus::Idle | PurchaseStatus::Failed(_) => {
                ScreenOutcome::Navigate(CheckoutStep::Payment)
            }
            PurchaseStatus::Pending | PurchaseStatus::Succeeded => ScreenOutcome::Stay,
        }
    }

    /// "Start New Purchase", only offered on the success view.
    pub fn start_over(&self) -> ScreenOutcome {
        if self.status == PurchaseStatus::Succeeded {
            ScreenOutcome::Navigate(CheckoutStep::Product)
        } else {
            ScreenOutcome::Stay
        }
    }

    pub(super) fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        state: &WizardState,
    ) -> fmt::Result {
        if self.status == PurchaseStatus::Succeeded {
            writeln!(f, "Congrats!")?;
            writeln!(f, "You've successfully purchased a MasterClass account.")?;
            writeln!(f)?;
            return writeln!(f, "[Start New Purchase]");
        }

        writeln!(f, "Order Confirmation")?;
        writeln!(f)?;
        writeln!(f, "Selected Product")?;
        if let Some(id) = state.cart.selected_product_id {
            writeln!(f, "  Product ID: {id}")?;
        }
        writeln!(f, "Registration Information")?;
        if let Some(registration) = &state.registration {
            writeln!(f, "  Name: {}", registration.name)?;
            writeln!(f, "  Address: {}", registration.address)?;
        }
        writeln!(f, "Payment Information")?;
        if let Some(payment) = &state.payment {
            writeln!(f, "  Cardholder: {}", payment.cardholder_name)?;
            writeln!(
                f,
                "  Card Number: {}",
                mask_card_number(&payment.card_number)
            )?;
        }
        writeln!(f)?;
        if let PurchaseStatus::Failed(message) = &self.status {
            writeln!(f, "Error: {message}")?;
            writeln!(f)?;
        }
        if self.is_pending() {
            writeln!(f, "[Back] (disabled) [Processing...] (disabled)")
        } else {
            writeln!(f, "[Back] [Confirm Purchase]")
        }
    }
}

impl Default for ConfirmationScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use checkout_core::storage::MemoryStorage;
    use checkout_core::{PaymentData, RegistrationData, STORAGE_KEY};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::screens::ActiveScreen;

    async fn completed_store(storage: &MemoryStorage) -> WizardStore {
        let mut store = WizardStore::open(Box::new(storage.clone())).await;
        store.select_product(1).await.unwrap();
        store
            .set_registration(RegistrationData::new("John Doe", "123 Main Street"))
            .await
            .unwrap();
        store
            .set_payment(PaymentData::new("JOHN DOE", "4242424242424242"))
            .await
            .unwrap();
        store.set_step(CheckoutStep::Confirmation).await.unwrap();
        store
    }

    fn render(
        screen: ConfirmationScreen,
        state: &WizardState,
    ) -> String {
        ActiveScreen::Confirmation(screen).view(state).to_string()
    }

    #[tokio::test]
    async fn summary_masks_the_card_number() {
        let store = completed_store(&MemoryStorage::new()).await;

        let text = render(ConfirmationScreen::new(), store.state());

        assert!(text.contains("Product ID: 1"));
        assert!(text.contains("Name: John Doe"));
        assert!(text.contains("Card Number: **** **** **** 4242"));
        assert!(!text.contains("4242424242424242"));
    }

    #[tokio::test]
    async fn second_confirm_while_pending_is_refused() {
        let store = completed_store(&MemoryStorage::new()).await;
        let mut screen = ConfirmationScreen::new();

        assert!(screen.begin_purchase(store.state()).is_some());
        assert!(screen.begin_purchase(store.state()).is_none());
        assert_eq!(screen.back(), ScreenOutcome::Stay);
        assert!(render(screen, store.state()).contains("[Processing...] (disabled)"));
    }

    #[test]
    fn confirm_without_payment_does_nothing() {
        let mut screen = ConfirmationScreen::new();

        assert!(screen.begin_purchase(&WizardState::default()).is_none());
        assert_eq!(screen.status(), &PurchaseStatus::Idle);
    }

    #[tokio::test]
    async fn failure_keeps_state_and_allows_retry() {
        let storage = MemoryStorage::new();
        let mut store = completed_store(&storage).await;
        let before = store.state().clone();
        let mut screen = ConfirmationScreen::new();
        let token = screen.begin_purchase(store.state()).unwrap();

        let applied = screen
            .finish_purchase(
                &token,
                Err(ServiceError::Processing(
                    "Payment processing failed".to_string(),
                )),
                &mut store,
            )
            .await
            .unwrap();

        assert!(applied);
        assert_eq!(store.state(), &before);
        assert_eq!(
            screen.back(),
            ScreenOutcome::Navigate(CheckoutStep::Payment)
        );
        assert!(screen.begin_purchase(store.state()).is_some());
    }

    #[tokio::test]
    async fn failure_alert_is_rendered_with_the_summary() {
        let mut store = completed_store(&MemoryStorage::new()).await;
        let mut screen = ConfirmationScreen::new();
        let token = screen.begin_purchase(store.state()).unwrap();
        screen
            .finish_purchase(
                &token,
                Err(ServiceError::Processing(
                    "Payment processing failed".to_string(),
                )),
                &mut store,
            )
            .await
            .unwrap();

        let text = render(screen, store.state());

        assert!(text.contains("Error: Payment processing failed"));
        assert!(text.contains("Cardholder: JOHN DOE"));
    }

    #[tokio::test]
    async fn success_resets_the_wizard_and_clears_the_slot() {
        let storage = MemoryStorage::new();
        let mut store = completed_store(&storage).await;
        let mut screen = ConfirmationScreen::new();
        let token = screen.begin_purchase(store.state()).unwrap();

        screen
            .finish_purchase(&token, Ok(PurchaseOutcome::Success), &mut store)
            .await
            .unwrap();

        assert_eq!(store.state(), &WizardState::default());
        assert_eq!(storage.peek(STORAGE_KEY), None);
        assert_eq!(
            screen.start_over(),
            ScreenOutcome::Navigate(CheckoutStep::Product)
        );
        assert!(render(screen, store.state()).contains("Congrats!"));
    }

    #[tokio::test]
    async fn result_after_unmount_is_ignored() {
        let mut store = completed_store(&MemoryStorage::new()).await;
        let mut old = ConfirmationScreen::new();
        let token = old.begin_purchase(store.state()).unwrap();
        drop(old);
        let mut screen = ConfirmationScreen::new();

        let applied = screen
            .finish_purchase(&token, Ok(PurchaseOutcome::Success), &mut store)
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(store.current_step(), CheckoutStep::Confirmation);
    }
}
