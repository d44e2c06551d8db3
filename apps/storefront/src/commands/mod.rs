//! # Commands Module
//!
//! User intents, applied to view state.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Categories, products, product detail, sizes
//! ├── auth.rs     ◄─── Sign-in / sign-up form, verification, sign-out
//! └── cart.rs     ◄─── Cart manipulation
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Shell line "open 2"                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CatalogController::select_category("Shirts")                           │
//! │         │  state.replace(loading)                                       │
//! │         │  CatalogService::list_products(.., token)                     │
//! │         │  state.replace_if(token live => with_products)                │
//! │         ▼                                                               │
//! │  Shell renders CatalogViewState snapshot                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog and auth commands are methods on controllers that own their
//! view state. Cart commands are free functions over [`CartState`], which
//! all three shopping screens share.
//!
//! [`CartState`]: crate::state::CartState

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthController, DEMO_EMAIL, DEMO_PASSWORD};
pub use catalog::{CatalogController, FetchOutcome};
