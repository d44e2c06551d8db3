//! # Cart State
//!
//! The shopping cart shared by the Items, Product Details and Cart screens.
//!
//! ## Thread Safety
//! The cart lives in a [`StateHolder`]. Each mutation clones the current
//! cart, applies one operation and swaps the result in under the holder's
//! lock, so concurrent commands are serialized and observers only ever see
//! whole carts.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Shell Action            Command               Cart State Change        │
//! │  ────────────            ───────               ─────────────────        │
//! │                                                                         │
//! │  add <n> ───────────────► add_to_cart() ─────► increase(product)       │
//! │                                                                         │
//! │  add (on details) ──────► add_sized() ───────► increase_with_size()    │
//! │                                                                         │
//! │  dec <n> ───────────────► decrease_item() ───► decrease(product)       │
//! │                                                                         │
//! │  rm <n> ────────────────► remove_item() ─────► remove(product)         │
//! │                                                                         │
//! │  clear ─────────────────► clear_cart() ──────► clear()                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use flash_core::{Cart, CartLine, Product};
use serde::Serialize;
use tokio::sync::watch;
use ts_rs::TS;

use super::holder::StateHolder;

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        CartLineView {
            product: line.product.clone(),
            quantity: line.quantity,
            unit_price_cents: line.product.discounted_price().cents(),
            line_total_cents: line.line_total().cents(),
        }
    }
}

/// Render snapshot of the cart: rows, badge count and total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub total_cents: i64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            total_cents: cart.total().cents(),
        }
    }
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart state container.
#[derive(Debug, Default)]
pub struct CartState {
    cart: StateHolder<Cart>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        self.cart.with(f)
    }

    /// Applies one mutation and returns the resulting view.
    pub fn with_cart_mut<F>(&self, f: F) -> CartView
    where
        F: FnOnce(&mut Cart),
    {
        let mut view = CartView::default();
        self.cart.replace(|current| {
            let mut next = current.clone();
            f(&mut next);
            view = CartView::from(&next);
            next
        });
        view
    }

    pub fn view(&self) -> CartView {
        self.with_cart(|cart| CartView::from(cart))
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }
}
