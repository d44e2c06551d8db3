//! # Catalog View State
//!
//! Snapshot rendered by the Start, Items and Product Details screens.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Load Phases                                  │
//! │                                                                         │
//! │   Idle ──loading()──► Loading ──with_categories()/with_products()──►   │
//! │                          │                                 Loaded       │
//! │                          └──────with_error()────────────► Failed       │
//! │                                                                         │
//! │   Every transition returns a new snapshot; nothing is edited in place. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use flash_core::{related_products, Category, Product, ProductDetail, RelatedProduct};
use serde::Serialize;
use ts_rs::TS;

/// Suggestions shown in the "Pair it with" row.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Where the most recent fetch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogViewState {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub selected_category: Option<String>,
    pub selected_product: Option<ProductDetail>,
    pub selected_size: Option<String>,
    pub related_products: Vec<RelatedProduct>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set once any fetch has succeeded.
    pub has_loaded: bool,
}

impl CatalogViewState {
    pub fn phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if self.error.is_some() {
            LoadPhase::Failed
        } else if self.has_loaded {
            LoadPhase::Loaded
        } else {
            LoadPhase::Idle
        }
    }

    /// A fetch started: loading on, previous error gone.
    pub fn loading(&self) -> Self {
        CatalogViewState {
            is_loading: true,
            error: None,
            ..self.clone()
        }
    }

    /// The fetch was abandoned; drops the loading flag only.
    pub fn idle(&self) -> Self {
        CatalogViewState {
            is_loading: false,
            ..self.clone()
        }
    }

    pub fn with_categories(&self, categories: Vec<Category>) -> Self {
        CatalogViewState {
            categories,
            is_loading: false,
            error: None,
            has_loaded: true,
            ..self.clone()
        }
    }

    /// Stores the selection and clears the previous category's products.
    pub fn with_category_selected(&self, category_name: &str) -> Self {
        CatalogViewState {
            selected_category: Some(category_name.to_string()),
            products: Vec::new(),
            ..self.clone()
        }
    }

    pub fn with_products(&self, products: Vec<Product>) -> Self {
        CatalogViewState {
            products,
            is_loading: false,
            error: None,
            has_loaded: true,
            ..self.clone()
        }
    }

    /// Opens `detail`, preselects the first size in stock and derives the
    /// related products from the current listing.
    pub fn with_product_selected(&self, detail: ProductDetail) -> Self {
        let related = related_products(&detail, &self.products, RELATED_PRODUCTS_LIMIT);
        CatalogViewState {
            selected_size: detail.default_size().map(str::to_string),
            selected_product: Some(detail),
            related_products: related,
            is_loading: false,
            error: None,
            has_loaded: true,
            ..self.clone()
        }
    }

    pub fn without_selected_product(&self) -> Self {
        CatalogViewState {
            selected_product: None,
            selected_size: None,
            related_products: Vec::new(),
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: &str) -> Self {
        CatalogViewState {
            selected_size: Some(size.to_string()),
            ..self.clone()
        }
    }

    pub fn with_error(&self, message: impl Into<String>) -> Self {
        CatalogViewState {
            is_loading: false,
            error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn without_error(&self) -> Self {
        CatalogViewState {
            error: None,
            ..self.clone()
        }
    }

    /// 1-based lookup used by the shell's numbered listings.
    pub fn category_at(&self, index: usize) -> Option<&Category> {
        index.checked_sub(1).and_then(|i| self.categories.get(i))
    }

    pub fn product_at(&self, index: usize) -> Option<&Product> {
        index.checked_sub(1).and_then(|i| self.products.get(i))
    }
}
