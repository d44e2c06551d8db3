//! # Catalog Service
//!
//! The remote catalog contract: categories, products per category and
//! product details. Every call takes a [`CancellationToken`]; a cancelled
//! call resolves to [`RemoteError::Cancelled`] without waiting for the
//! backend.
//!
//! ## Fetch Lifecycle
//! ```text
//! controller                      CatalogService                 backend
//! ──────────                      ──────────────                 ───────
//! token = new()
//! list_products("Shirts", token) ─► select! { request, cancelled } ──► HTTP
//!        ...user leaves screen...
//! token.cancel() ─────────────────► Err(Cancelled)       (response dropped)
//! ```

use std::future::Future;

use async_trait::async_trait;
use flash_core::{Category, Product, ProductDetail};
use tokio_util::sync::CancellationToken;

use crate::error::{RemoteError, RemoteResult};

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists every category.
    async fn list_categories(&self, cancel: &CancellationToken) -> RemoteResult<Vec<Category>>;

    /// Lists the products whose `categoryName` equals `category_name`.
    async fn list_products(
        &self,
        category_name: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<Vec<Product>>;

    /// Loads one product with its variants.
    async fn get_product_detail(
        &self,
        product_id: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<ProductDetail>;
}

/// Races `request` against `cancel`.
///
/// A token that is already cancelled short-circuits before `request` is
/// polled.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, request: F) -> RemoteResult<T>
where
    F: Future<Output = RemoteResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RemoteError::Cancelled),
        result = request => result,
    }
}
