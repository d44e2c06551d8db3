//! # Cart Commands
//!
//! Cart manipulation shared by the Items, Product Details and Cart screens.
//! Every command returns the updated [`CartView`].
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  add_to_cart   ┌──────────┐                              │
//! │  │  Empty   │───────────────►│ In Cart  │◄──┐ add_to_cart / add_sized  │
//! │  │  Cart    │  add_sized     │          │───┘ decrease_item            │
//! │  └──────────┘                └──────────┘                              │
//! │       ▲                           │                                     │
//! │       └──── clear_cart / last decrease_item / remove_item ──────       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use flash_core::{Product, ProductDetail};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, CartView};

pub fn get_cart(cart: &CartState) -> CartView {
    cart.view()
}

/// Adds one unit of a listed product.
pub fn add_to_cart(cart: &CartState, product: &Product) -> CartView {
    debug!(product = %product.name, "add_to_cart command");
    cart.with_cart_mut(|c| c.increase(product))
}

/// Adds one unit of `size` from the open product detail.
///
/// Unknown sizes and sizes without stock are refused before the cart is
/// touched.
pub fn add_sized(cart: &CartState, detail: &ProductDetail, size: &str) -> Result<CartView, ApiError> {
    let variant = detail.orderable_variant(size)?;
    debug!(product = %detail.name, size = %variant.size, "add_sized command");

    let size = variant.size.clone();
    Ok(cart.with_cart_mut(|c| {
        c.increase_with_size(detail, &size);
    }))
}

pub fn decrease_item(cart: &CartState, product: &Product) -> CartView {
    debug!(product = %product.name, "decrease_item command");
    cart.with_cart_mut(|c| c.decrease(product))
}

pub fn remove_item(cart: &CartState, product: &Product) -> CartView {
    debug!(product = %product.name, "remove_item command");
    cart.with_cart_mut(|c| c.remove(product))
}

pub fn clear_cart(cart: &CartState) -> CartView {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| c.clear())
}

/// Product on the 1-based cart row `index`.
pub fn line_product(cart: &CartState, index: usize) -> Result<Product, ApiError> {
    cart.with_cart(|c| {
        index
            .checked_sub(1)
            .and_then(|i| c.lines().get(i))
            .map(|line| line.product.clone())
    })
    .ok_or_else(|| ApiError::cart(format!("There is no cart line {index}.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use flash_core::ProductVariant;

    fn item(name: &str, price_cents: i64, discount: u32) -> Product {
        Product::new(name, "Nike", "Shirts", price_cents).with_discount(discount)
    }

    fn detail() -> ProductDetail {
        let mut detail = ProductDetail::from(&item("Nike Shirt", 10000, 0).with_id("nike-shirt"));
        detail.variants = vec![ProductVariant::new("M", 3), ProductVariant::new("XL", 0)];
        detail
    }

    #[test]
    fn test_scenario_increase_and_decrease() {
        let cart = CartState::new();
        let a = item("Item A", 100, 0);

        assert_eq!(add_to_cart(&cart, &a).total_cents, 100);

        let view = add_to_cart(&cart, &a);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.total_cents, 200);

        let view = decrease_item(&cart, &a);
        assert_eq!(view.lines[0].quantity, 1);
        assert_eq!(view.total_cents, 100);

        let view = decrease_item(&cart, &a);
        assert!(view.is_empty());
        assert_eq!(view.total_cents, 0);
    }

    #[test]
    fn test_discounted_item_total() {
        let cart = CartState::new();
        let view = add_to_cart(&cart, &item("Item B", 20000, 25));
        assert_eq!(view.total_cents, 15000);
    }

    #[test]
    fn test_absent_product_is_no_op() {
        let cart = CartState::new();
        add_to_cart(&cart, &item("A", 100, 0));
        let before = get_cart(&cart);

        assert_eq!(decrease_item(&cart, &item("B", 100, 0)), before);
        assert_eq!(remove_item(&cart, &item("B", 100, 0)), before);
    }

    #[test]
    fn test_sizes_are_separate_lines() {
        let cart = CartState::new();
        let detail = detail();

        add_sized(&cart, &detail, "m").unwrap();
        let view = add_sized(&cart, &detail, "M").unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product.name, "Nike Shirt (M)");
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(
            view.lines[0].product.description.as_deref(),
            Some("No description available.")
        );
    }

    #[test]
    fn test_unorderable_sizes_refused() {
        let cart = CartState::new();
        let detail = detail();

        let err = add_sized(&cart, &detail, "XL").unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfStock);

        let err = add_sized(&cart, &detail, "XXS").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&cart).is_empty());
    }

    #[test]
    fn test_line_lookup_and_clear() {
        let cart = CartState::new();
        add_to_cart(&cart, &item("A", 100, 0));
        add_to_cart(&cart, &item("B", 250, 0));

        assert_eq!(line_product(&cart, 2).unwrap().name, "B");
        assert!(line_product(&cart, 0).is_err());
        assert!(line_product(&cart, 3).is_err());

        let view = remove_item(&cart, &line_product(&cart, 1).unwrap());
        assert_eq!(view.item_count, 1);
        assert!(clear_cart(&cart).is_empty());
    }
}
