//! # flash-core: Pure Business Logic for the Flash Storefront
//!
//! This crate holds the storefront's domain model and the cart state
//! container. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Flash Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Terminal Shell (apps/storefront)                │   │
//! │  │   Start ──► Items ──► Product Detail ──► Cart ──► Account       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ user intents / view snapshots          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ flash-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  email    │  │   │
//! │  │   │ Category  │  │ Discounts │  │ CartLine  │  │ password  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            flash-remote (Firestore / Firebase Auth)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, ProductDetail, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart state container
//! - [`error`] - Domain error types
//! - [`validation`] - Credential and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use flash_core::{Cart, Product};
//!
//! let shirt = Product::new("Adidas Shirt", "Adidas", "Shirts", 20000).with_discount(25);
//!
//! let mut cart = Cart::new();
//! cart.increase(&shirt);
//!
//! // $200.00 at 25% off
//! assert_eq!(cart.total().cents(), 15000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length accepted by the identity provider on sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Description given to cart lines built from a product detail that has none.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
