//! # Domain Types
//!
//! Catalog types used throughout the storefront.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │     Product     │   │  ProductDetail  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │◄──│  category_name  │   │  product fields │       │
//! │  │  image_url      │   │  price_cents    │   │  variants[]  ───┼──┐    │
//! │  └─────────────────┘   │  discount_pct   │   └─────────────────┘  │    │
//! │                        └─────────────────┘                        │    │
//! │  ┌─────────────────┐   ┌─────────────────┐                        │    │
//! │  │ RelatedProduct  │   │ ProductVariant  │◄───────────────────────┘    │
//! │  │  ("pair it      │   │  size           │                             │
//! │  │   with")        │   │  stock (display)│                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `Product` equality is structural over every field, including the
//! Firestore document `id`. Locally synthesized products (sized cart lines)
//! carry an empty id and therefore compare by their remaining fields.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::DEFAULT_DESCRIPTION;

// =============================================================================
// Category
// =============================================================================

/// A catalog category (one document of the `categories` collection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub name: String,
    pub image_url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Category {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Firestore document id. Empty for locally built products.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Brand shown above the name.
    pub brand: String,

    /// Name of the category this product belongs to.
    pub category_name: String,

    /// List price in cents.
    pub price_cents: i64,

    /// Optional long description.
    pub description: Option<String>,

    /// Whole-percent discount (25 = 25% off). Not range-checked.
    pub discount_percent: u32,

    /// Remote image location.
    pub image_url: String,
}

impl Product {
    /// Creates a product with no id, discount, description or image.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        category_name: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Product {
            name: name.into(),
            brand: brand.into(),
            category_name: category_name.into(),
            price_cents,
            ..Product::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_discount(mut self, discount_percent: u32) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Returns the list price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit price after the product discount.
    ///
    /// ## Example
    /// ```rust
    /// use flash_core::Product;
    ///
    /// let p = Product::new("Gucci Pants", "Gucci", "Pants", 20000).with_discount(25);
    /// assert_eq!(p.discounted_price().cents(), 15000);
    /// ```
    #[inline]
    pub fn discounted_price(&self) -> Money {
        self.price().apply_percentage_discount(self.discount_percent)
    }

    /// Checks whether any discount applies.
    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.discount_percent > 0
    }
}

// =============================================================================
// Product Variant
// =============================================================================

/// A size offered for a product. `stock` is display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductVariant {
    pub size: String,
    pub stock: i64,
}

impl ProductVariant {
    pub fn new(size: impl Into<String>, stock: i64) -> Self {
        ProductVariant {
            size: size.into(),
            stock,
        }
    }

    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Stock line shown under the size picker.
    pub fn stock_message(&self) -> String {
        match self.stock {
            s if s <= 0 => "Out of stock".to_string(),
            1 => "Hurry, only 1 item left in stock!".to_string(),
            s if s <= LOW_STOCK_THRESHOLD => format!("Hurry, only {s} items left in stock!"),
            _ => "In stock".to_string(),
        }
    }
}

/// At or below this many units the stock line turns into a warning.
pub const LOW_STOCK_THRESHOLD: i64 = 3;

// =============================================================================
// Product Detail
// =============================================================================

/// Extended product record for the detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category_name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub discount_percent: u32,
    pub image_url: String,
    pub variants: Vec<ProductVariant>,
}

impl ProductDetail {
    /// Looks up a variant by size (case-insensitive).
    pub fn variant(&self, size: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.size.eq_ignore_ascii_case(size))
    }

    /// Size preselected on the detail screen: the first variant in stock.
    pub fn default_size(&self) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.in_stock())
            .map(|v| v.size.as_str())
    }

    /// Returns the variant for `size` if it exists and can be ordered.
    pub fn orderable_variant(&self, size: &str) -> CoreResult<&ProductVariant> {
        let variant = self.variant(size).ok_or_else(|| CoreError::UnknownSize {
            product: self.name.clone(),
            size: size.to_string(),
        })?;
        if !variant.in_stock() {
            return Err(CoreError::OutOfStock {
                product: self.name.clone(),
                size: variant.size.clone(),
            });
        }
        Ok(variant)
    }

    /// Builds the cart product for one size of this detail.
    ///
    /// The size is folded into the name so that every size becomes its own
    /// cart line. A missing or empty description becomes
    /// [`DEFAULT_DESCRIPTION`].
    pub fn sized_product(&self, size: &str) -> Product {
        let description = self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);

        Product {
            id: String::new(),
            name: format!("{} ({})", self.name, size),
            brand: self.brand.clone(),
            category_name: self.category_name.clone(),
            price_cents: self.price_cents,
            description: Some(description.to_string()),
            discount_percent: self.discount_percent,
            image_url: self.image_url.clone(),
        }
    }

    /// Returns the unit price after discount.
    pub fn discounted_price(&self) -> Money {
        Money::from_cents(self.price_cents).apply_percentage_discount(self.discount_percent)
    }
}

/// A listed product opens as a detail with no known variants.
impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        ProductDetail {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category_name: product.category_name.clone(),
            price_cents: product.price_cents,
            description: product.description.clone(),
            discount_percent: product.discount_percent,
            image_url: product.image_url.clone(),
            variants: Vec::new(),
        }
    }
}

// =============================================================================
// Related Product
// =============================================================================

/// Compact product card for the "Pair it with" row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RelatedProduct {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub image_url: String,
}

impl From<&Product> for RelatedProduct {
    fn from(product: &Product) -> Self {
        RelatedProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            image_url: product.image_url.clone(),
        }
    }
}

/// Picks up to `limit` products to pair with `detail`, skipping the detail
/// itself. Order follows `candidates`.
pub fn related_products(
    detail: &ProductDetail,
    candidates: &[Product],
    limit: usize,
) -> Vec<RelatedProduct> {
    candidates
        .iter()
        .filter(|p| p.category_name == detail.category_name)
        .filter(|p| !(p.id == detail.id && p.name == detail.name))
        .take(limit)
        .map(RelatedProduct::from)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
