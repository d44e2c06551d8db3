//! # Catalog Commands
//!
//! Drives the Start, Items and Product Details screens.
//!
//! ## Fetch Supersession
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Fetch In Flight                                  │
//! │                                                                         │
//! │  select_category("Shirts")                                              │
//! │     token A ──► list_products("Shirts", A) ........ slow ......         │
//! │                                                                         │
//! │  select_category("Pants")                                               │
//! │     A.cancel()                                                          │
//! │     token B ──► list_products("Pants", B) ──► Ok ──► write (B live)     │
//! │                                                                         │
//! │  "Shirts" resolves ──► A cancelled ──► Discarded, nothing written       │
//! │                                                                         │
//! │  The token is checked again inside the state lock, so a response that  │
//! │  raced past cancellation still cannot write.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use flash_core::validation::validate_category_name;
use flash_core::{CoreError, ProductDetail};
use flash_remote::{CatalogService, RemoteResult};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{CatalogViewState, StateHolder};

/// What happened to a fetch's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written to the view state.
    Applied,
    /// A newer fetch or leaving the screen superseded this one.
    Discarded,
}

pub struct CatalogController {
    catalog: Arc<dyn CatalogService>,
    state: StateHolder<CatalogViewState>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl CatalogController {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        CatalogController {
            catalog,
            state: StateHolder::default(),
            in_flight: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> CatalogViewState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogViewState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Fetches
    // =========================================================================

    /// Loads every category for the Start screen.
    pub async fn load_categories(&self) -> Result<FetchOutcome, ApiError> {
        let token = self.begin_fetch(CatalogViewState::loading).await;
        debug!("Loading categories");

        let result = self.catalog.list_categories(&token).await;
        self.finish(&token, result, |state, categories| {
            info!(count = categories.len(), "Categories loaded");
            state.with_categories(categories)
        })
    }

    /// Stores the selection, drops the previous listing and fetches the
    /// category's products.
    pub async fn select_category(&self, category_name: &str) -> Result<FetchOutcome, ApiError> {
        let category_name = validate_category_name(category_name)
            .map_err(|e| ApiError::from(CoreError::from(e)))?;

        let token = self
            .begin_fetch(|state| state.with_category_selected(&category_name).loading())
            .await;
        debug!(category = %category_name, "Loading products");

        let result = self.catalog.list_products(&category_name, &token).await;
        self.finish(&token, result, |state, products| {
            info!(category = %category_name, count = products.len(), "Products loaded");
            state.with_products(products)
        })
    }

    /// Loads one product with its sizes and opens it.
    pub async fn fetch_product_detail(&self, product_id: &str) -> Result<FetchOutcome, ApiError> {
        let token = self.begin_fetch(CatalogViewState::loading).await;
        debug!(product_id, "Loading product detail");

        let result = self.catalog.get_product_detail(product_id, &token).await;
        self.finish(&token, result, |state, detail| state.with_product_selected(detail))
    }

    /// Abandons whatever is loading. Called when the Items screen is left.
    pub async fn leave_items_screen(&self) {
        self.cancel_in_flight().await;
        self.state.replace(CatalogViewState::idle);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Opens a detail the caller already has, superseding any pending fetch.
    pub async fn select_product(&self, detail: ProductDetail) {
        self.cancel_in_flight().await;
        debug!(product_id = %detail.id, "Product selected");
        self.state
            .replace(move |state| state.idle().with_product_selected(detail));
    }

    pub fn clear_selected_product(&self) {
        self.state.replace(CatalogViewState::without_selected_product);
    }

    /// Picks a size on the open product. Sizes without stock can be picked
    /// so their stock line shows; adding them to the cart is refused.
    pub fn select_size(&self, size: &str) -> Result<String, ApiError> {
        let canonical = self.state.with(|state| {
            let detail = state
                .selected_product
                .as_ref()
                .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "No product is open."))?;
            detail
                .variant(size)
                .map(|variant| variant.size.clone())
                .ok_or_else(|| {
                    ApiError::from(CoreError::UnknownSize {
                        product: detail.name.clone(),
                        size: size.to_string(),
                    })
                })
        })?;

        self.state.replace(|state| state.with_size(&canonical));
        Ok(canonical)
    }

    pub fn clear_error(&self) {
        self.state.replace(CatalogViewState::without_error);
    }

    // =========================================================================
    // In-flight bookkeeping
    // =========================================================================

    /// Cancels the previous fetch, registers a new token and applies the
    /// starting transition.
    async fn begin_fetch(
        &self,
        start: impl FnOnce(&CatalogViewState) -> CatalogViewState,
    ) -> CancellationToken {
        let token = CancellationToken::new();
        {
            let mut slot = self.in_flight.lock().await;
            if let Some(previous) = slot.replace(token.clone()) {
                previous.cancel();
            }
        }
        self.state.replace(start);
        token
    }

    async fn cancel_in_flight(&self) {
        if let Some(token) = self.in_flight.lock().await.take() {
            token.cancel();
        }
    }

    /// Writes `result` unless `token` was cancelled in the meantime.
    fn finish<T>(
        &self,
        token: &CancellationToken,
        result: RemoteResult<T>,
        apply: impl FnOnce(&CatalogViewState, T) -> CatalogViewState,
    ) -> Result<FetchOutcome, ApiError> {
        match result {
            Ok(value) => {
                let written = self
                    .state
                    .replace_if(|state| (!token.is_cancelled()).then(|| apply(state, value)));
                Ok(Self::outcome(written))
            }
            Err(err) if err.is_cancelled() => {
                debug!("Fetch cancelled");
                Ok(FetchOutcome::Discarded)
            }
            Err(err) => {
                let err = ApiError::from(err);
                let written = self.state.replace_if(|state| {
                    (!token.is_cancelled()).then(|| state.with_error(err.message.clone()))
                });
                if !written {
                    return Ok(FetchOutcome::Discarded);
                }
                warn!(error = %err, "Catalog fetch failed");
                Err(err)
            }
        }
    }

    fn outcome(written: bool) -> FetchOutcome {
        if written {
            FetchOutcome::Applied
        } else {
            debug!("Stale fetch result discarded");
            FetchOutcome::Discarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flash_core::{Category, Product, ProductVariant};
    use flash_remote::{run_cancellable, DemoCatalog, RemoteError};
    use std::time::Duration;

    /// Catalog whose timing and failures are picked by category name.
    ///
    /// - `"Slow"` answers after 200ms and honors cancellation.
    /// - `"Stubborn"` answers after 100ms and ignores cancellation.
    /// - `"Broken"` fails with `NotFound`.
    /// - anything else answers at once with one product named after it.
    struct ScriptedCatalog;

    fn product_named(name: &str) -> Product {
        Product::new(name, "Nike", name, 1000).with_id(name.to_lowercase())
    }

    #[async_trait]
    impl CatalogService for ScriptedCatalog {
        async fn list_categories(
            &self,
            cancel: &CancellationToken,
        ) -> RemoteResult<Vec<Category>> {
            run_cancellable(cancel, async { Ok(vec![Category::new("Shirts", "")]) }).await
        }

        async fn list_products(
            &self,
            category_name: &str,
            cancel: &CancellationToken,
        ) -> RemoteResult<Vec<Product>> {
            match category_name {
                "Slow" => {
                    run_cancellable(cancel, async {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        Ok(vec![product_named("Slow")])
                    })
                    .await
                }
                "Stubborn" => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(vec![product_named("Stubborn")])
                }
                "Broken" => Err(RemoteError::NotFound("Category Broken".into())),
                other => Ok(vec![product_named(other)]),
            }
        }

        async fn get_product_detail(
            &self,
            product_id: &str,
            _cancel: &CancellationToken,
        ) -> RemoteResult<ProductDetail> {
            let mut detail = ProductDetail::from(&product_named(product_id));
            detail.variants = vec![ProductVariant::new("S", 0), ProductVariant::new("M", 4)];
            Ok(detail)
        }
    }

    fn controller() -> Arc<CatalogController> {
        Arc::new(CatalogController::new(Arc::new(ScriptedCatalog)))
    }

    #[tokio::test]
    async fn test_load_categories_applies() {
        let catalog = controller();
        let outcome = catalog.load_categories().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied);
        let state = catalog.snapshot();
        assert_eq!(state.categories.len(), 1);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_newer_category_supersedes_slow_one() {
        let catalog = controller();
        let slow = {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.select_category("Slow").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(catalog.snapshot().is_loading);

        let outcome = catalog.select_category("Pants").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);

        assert_eq!(slow.await.unwrap().unwrap(), FetchOutcome::Discarded);
        let state = catalog.snapshot();
        assert_eq!(state.selected_category.as_deref(), Some("Pants"));
        assert_eq!(state.products[0].name, "Pants");
    }

    #[tokio::test]
    async fn test_result_ignoring_cancellation_is_not_written() {
        let catalog = controller();
        let stubborn = {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.select_category("Stubborn").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        catalog.leave_items_screen().await;

        assert_eq!(stubborn.await.unwrap().unwrap(), FetchOutcome::Discarded);
        let state = catalog.snapshot();
        assert!(state.products.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_clears_loading() {
        let catalog = controller();
        let err = catalog.select_category("Broken").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        let state = catalog.snapshot();
        assert_eq!(state.error.as_deref(), Some("Category Broken could not be found."));
        assert!(!state.is_loading);

        catalog.clear_error();
        assert_eq!(catalog.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_blank_category_rejected_before_fetch() {
        let catalog = controller();
        let err = catalog.select_category("  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!catalog.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_detail_then_size_selection() {
        let catalog = controller();
        catalog.fetch_product_detail("Shirt").await.unwrap();

        let state = catalog.snapshot();
        assert_eq!(state.selected_size.as_deref(), Some("M"));

        assert_eq!(catalog.select_size("s").unwrap(), "S");
        assert_eq!(catalog.snapshot().selected_size.as_deref(), Some("S"));

        let err = catalog.select_size("XXL").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        catalog.clear_selected_product();
        assert!(catalog.snapshot().selected_product.is_none());
        assert!(catalog.select_size("M").is_err());
    }

    #[tokio::test]
    async fn test_demo_catalog_round() {
        let catalog = CatalogController::new(Arc::new(DemoCatalog::new()));
        catalog.load_categories().await.unwrap();
        catalog.select_category("Shirts").await.unwrap();

        let state = catalog.snapshot();
        assert_eq!(state.products.len(), 5);

        let listed = state.products[0].clone();
        catalog.select_product(ProductDetail::from(&listed)).await;
        let state = catalog.snapshot();
        assert_eq!(state.related_products.len(), 4);
        assert!(state.related_products.iter().all(|r| r.id != listed.id));
    }
}
