use std::fmt;
use std::sync::Arc;

use checkout_core::{
    CatalogService, CheckoutStep, Product, ServiceError, StoreError, WizardState, WizardStore,
};
use tracing::{debug, info, warn};

use super::{MountScope, ScopeToken, ScreenOutcome};

/// Catalog fetch progress for one mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoad {
    Loading,
    Loaded(Vec<Product>),
    Failed(String),
}

#[derive(Debug)]
pub struct ProductScreen {
    scope: MountScope,
    load: CatalogLoad,
    notice: Option<String>,
}

impl ProductScreen {
    pub fn new() -> Self {
        Self {
            scope: MountScope::new(),
            load: CatalogLoad::Loading,
            notice: None,
        }
    }

    /// Token for this mount's catalog fetch.
    pub fn fetch_token(&self) -> ScopeToken {
        self.scope.token()
    }

    /// Fetches the catalog on behalf of the mount that issued `token`.
    /// Returns `None` when that mount is gone by the time the call resolves.
    pub async fn fetch(
        token: ScopeToken,
        catalog: Arc<dyn CatalogService>,
    ) -> Option<Result<Vec<Product>, ServiceError>> {
        let result = catalog.fetch_products().await;
        if token.is_live() {
            Some(result)
        } else {
            debug!("catalog result dropped; screen unmounted");
            None
        }
    }

    /// Applies a fetch result. Returns `false` and changes nothing when the
    /// result belongs to another mount.
    pub fn finish_loading(
        &mut self,
        token: &ScopeToken,
        result: Result<Vec<Product>, ServiceError>,
    ) -> bool {
        if !self.scope.accepts(token) {
            debug!("ignoring stale catalog result");
            return false;
        }
        self.load = match result {
            Ok(products) => {
                info!(count = products.len(), "catalog loaded");
                CatalogLoad::Loaded(products)
            }
            Err(error) => {
                warn!(%error, "catalog failed to load");
                CatalogLoad::Failed(error.to_string())
            }
        };
        true
    }

    pub fn load(&self) -> &CatalogLoad {
        &self.load
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Selects a listed product. Ids not in the loaded list are refused.
    pub async fn select(
        &mut self,
        store: &mut WizardStore,
        product_id: i64,
    ) -> Result<ScreenOutcome, StoreError> {
        let listed = match &self.load {
            CatalogLoad::Loaded(products) => products.iter().any(|p| p.id == product_id),
            _ => false,
        };
        if !listed {
            self.notice = Some(format!("No product with id {product_id}"));
            return Ok(ScreenOutcome::Stay);
        }
        self.notice = None;
        store.select_product(product_id).await?;
        Ok(ScreenOutcome::Stay)
    }

    /// Continue is enabled once the catalog is loaded and a product is
    /// selected.
    pub fn can_continue(
        &self,
        state: &WizardState,
    ) -> bool {
        matches!(self.load, CatalogLoad::Loaded(_)) && state.cart.selected_product_id.is_some()
    }

    pub async fn continue_to_registration(
        &mut self,
        store: &mut WizardStore,
    ) -> Result<ScreenOutcome, StoreError> {
        if !self.can_continue(store.state()) {
            if matches!(self.load, CatalogLoad::Loaded(_)) {
                self.notice = Some("Please select a product".to_string());
            }
            return Ok(ScreenOutcome::Stay);
        }
        self.notice = None;
        store.set_step(CheckoutStep::Registration).await?;
        Ok(ScreenOutcome::Navigate(CheckoutStep::Registration))
    }

    pub(super) fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        state: &WizardState,
    ) -> fmt::Result {
        writeln!(f, "Select a Product")?;
        writeln!(f)?;
        match &self.load {
            CatalogLoad::Loading => writeln!(f, "Loading products...")?,
            CatalogLoad::Failed(message) => writeln!(f, "Error loading products: {message}")?,
            CatalogLoad::Loaded(products) => {
                for product in products {
                    let marker = if state.cart.selected_product_id == Some(product.id) {
                        "(*)"
                    } else {
                        "( )"
                    };
                    writeln!(f, "  {marker} {product}")?;
                }
            }
        }
        writeln!(f)?;
        if let Some(notice) = &self.notice {
            writeln!(f, "! {notice}")?;
        }
        let button = if self.can_continue(state) {
            "[Continue]"
        } else {
            "[Continue] (disabled)"
        };
        writeln!(f, "{button}")
    }
}

impl Default for ProductScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use checkout_core::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedCatalog;

    #[async_trait]
    impl CatalogService for FixedCatalog {
        async fn fetch_products(&self) -> Result<Vec<Product>, ServiceError> {
            Ok(catalog())
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "First Product"),
            Product::new(2, "Second Product"),
        ]
    }

    async fn store() -> WizardStore {
        WizardStore::open(Box::new(MemoryStorage::new())).await
    }

    fn loaded_screen() -> ProductScreen {
        let mut screen = ProductScreen::new();
        let token = screen.fetch_token();
        assert!(screen.finish_loading(&token, Ok(catalog())));
        screen
    }

    struct View<'a>(&'a ProductScreen, &'a WizardState);

    impl fmt::Display for View<'_> {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            self.0.render(f, self.1)
        }
    }

    fn render(
        screen: &ProductScreen,
        state: &WizardState,
    ) -> String {
        View(screen, state).to_string()
    }

    // =========================================================================
    // loading
    // =========================================================================

    #[test]
    fn starts_loading_with_continue_disabled() {
        let screen = ProductScreen::new();

        assert_eq!(screen.load(), &CatalogLoad::Loading);
        assert!(!screen.can_continue(&WizardState::default()));
        assert!(render(&screen, &WizardState::default()).contains("Loading products..."));
    }

    #[test]
    fn fetch_error_is_shown_and_blocks_continue() {
        let mut screen = ProductScreen::new();
        let token = screen.fetch_token();

        screen.finish_loading(
            &token,
            Err(ServiceError::Fetch("Failed to fetch products".to_string())),
        );

        let text = render(&screen, &WizardState::default());
        assert!(text.contains("Error loading products: Failed to fetch products"));
        assert!(text.contains("[Continue] (disabled)"));
    }

    #[test]
    fn result_for_another_mount_is_ignored() {
        let old = ProductScreen::new();
        let token = old.fetch_token();
        drop(old);
        let mut screen = ProductScreen::new();

        assert!(!screen.finish_loading(&token, Ok(catalog())));
        assert_eq!(screen.load(), &CatalogLoad::Loading);
    }

    #[tokio::test]
    async fn fetch_after_unmount_yields_nothing() {
        let screen = ProductScreen::new();
        let token = screen.fetch_token();
        drop(screen);

        assert_eq!(ProductScreen::fetch(token, Arc::new(FixedCatalog)).await, None);
    }

    #[tokio::test]
    async fn fetch_while_mounted_yields_the_catalog() {
        let screen = ProductScreen::new();

        let result = ProductScreen::fetch(screen.fetch_token(), Arc::new(FixedCatalog)).await;

        assert_eq!(result, Some(Ok(catalog())));
    }

    // =========================================================================
    // selection
    // =========================================================================

    #[tokio::test]
    async fn selecting_a_listed_product_marks_it() {
        let mut store = store().await;
        let mut screen = loaded_screen();

        let outcome = screen.select(&mut store, 2).await.unwrap();

        assert_eq!(outcome, ScreenOutcome::Stay);
        assert_eq!(store.state().cart.selected_product_id, Some(2));
        assert!(render(&screen, store.state()).contains("(*) #2 Second Product"));
        assert!(screen.can_continue(store.state()));
    }

    #[tokio::test]
    async fn unknown_ids_are_refused() {
        let mut store = store().await;
        let mut screen = loaded_screen();

        screen.select(&mut store, 9).await.unwrap();

        assert_eq!(store.state().cart.selected_product_id, None);
        assert_eq!(screen.notice(), Some("No product with id 9"));
    }

    #[tokio::test]
    async fn continue_without_selection_stays() {
        let mut store = store().await;
        let mut screen = loaded_screen();

        let outcome = screen.continue_to_registration(&mut store).await.unwrap();

        assert_eq!(outcome, ScreenOutcome::Stay);
        assert_eq!(screen.notice(), Some("Please select a product"));
        assert_eq!(store.current_step(), CheckoutStep::Product);
    }

    #[tokio::test]
    async fn continue_moves_to_registration() {
        let mut store = store().await;
        let mut screen = loaded_screen();
        screen.select(&mut store, 1).await.unwrap();

        let outcome = screen.continue_to_registration(&mut store).await.unwrap();

        assert_eq!(
            outcome,
            ScreenOutcome::Navigate(CheckoutStep::Registration)
        );
        assert_eq!(store.current_step(), CheckoutStep::Registration);
    }

    #[tokio::test]
    async fn saved_selection_survives_a_remount() {
        let mut store = store().await;
        loaded_screen().select(&mut store, 1).await.unwrap();

        let screen = loaded_screen();

        assert!(screen.can_continue(store.state()));
        assert!(render(&screen, store.state()).contains("(*) #1 First Product"));
    }
}
