//! # Cart
//!
//! The in-memory cart: a mapping from product to quantity plus a derived
//! total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action             Operation              Cart Change             │
//! │  ───────────             ─────────              ───────────             │
//! │                                                                         │
//! │  Tap "+" / Add ─────────► increase(p) ────────► qty + 1 (insert at 1)  │
//! │                                                                         │
//! │  Tap "-" ───────────────► decrease(p) ────────► qty - 1 (drop at 1)    │
//! │                                                                         │
//! │  Tap delete ────────────► remove(p) ──────────► line dropped           │
//! │                                                                         │
//! │  Every mutation recomputes `total` from scratch over all lines.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every present line has `quantity >= 1`
//! - Lines are unique by product equality and keep insertion order
//! - `total == round(Σ price × (1 - discount/100) × quantity)`, rounded once
//! - Absent products make `decrease`/`remove` a no-op, never an error

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, ProductDetail};

/// One product-quantity pairing held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Exact `price × (100 - discount) × quantity`, in hundredths of a cent.
    pub fn exact_total(&self) -> i128 {
        self.product
            .price()
            .discounted_hundredths(self.product.discount_percent, self.quantity)
    }

    /// The line's own total, rounded half-up to the cent.
    ///
    /// The cart total is not a sum of these; it rounds once over the exact
    /// line totals.
    pub fn line_total(&self) -> Money {
        Money::from_hundredths(self.exact_total())
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Money,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product`, inserting it at quantity 1 if absent.
    pub fn increase(&mut self, product: &Product) {
        match self.position(product) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        self.recompute_total();
    }

    /// Removes one unit of `product`. The line disappears when its last
    /// unit is removed. Does nothing if the product is not in the cart.
    pub fn decrease(&mut self, product: &Product) {
        let Some(i) = self.position(product) else {
            return;
        };

        if self.lines[i].quantity > 1 {
            self.lines[i].quantity -= 1;
        } else {
            self.lines.remove(i);
        }
        self.recompute_total();
    }

    /// Drops the whole line for `product` if present.
    pub fn remove(&mut self, product: &Product) {
        if let Some(i) = self.position(product) {
            self.lines.remove(i);
            self.recompute_total();
        }
    }

    /// Adds one unit of the given size of a product detail.
    ///
    /// Each size is its own line (see [`ProductDetail::sized_product`]).
    /// Returns the product that was added.
    pub fn increase_with_size(&mut self, detail: &ProductDetail, size: &str) -> Product {
        let product = detail.sized_product(size);
        self.increase(&product);
        product
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.recompute_total();
    }

    /// Total of all lines after discounts.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity held for `product`, or 0 when absent.
    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.position(product)
            .map(|i| self.lines[i].quantity)
            .unwrap_or(0)
    }

    /// Sum of quantities over all lines (the badge count).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product: &Product) -> Option<usize> {
        self.lines.iter().position(|l| &l.product == product)
    }

    // Recomputed from scratch; no running accumulator.
    fn recompute_total(&mut self) {
        let exact = self
            .lines
            .iter()
            .map(CartLine::exact_total)
            .fold(0i128, i128::saturating_add);
        self.total = Money::from_hundredths(exact);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
