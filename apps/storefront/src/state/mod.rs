//! # State Module
//!
//! View state for each screen plus application configuration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐ ┌──────────────────┐ ┌──────────────────┐    │
//! │  │ StateHolder<         │ │ StateHolder<     │ │ CartState        │    │
//! │  │  CatalogViewState>   │ │  AuthViewState>  │ │ (StateHolder<    │    │
//! │  │                      │ │                  │ │   Cart>)         │    │
//! │  └──────────┬───────────┘ └────────┬─────────┘ └────────┬─────────┘    │
//! │             │ replace()            │ replace()          │ with_cart_mut │
//! │             ▼                      ▼                    ▼               │
//! │       watch::Receiver ─────► renderer (terminal shell, or any UI)       │
//! │                                                                         │
//! │  AppConfig: read-only after startup                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod catalog;
mod config;
mod holder;

pub use auth::AuthViewState;
pub use cart::{CartLineView, CartState, CartView};
pub use catalog::{CatalogViewState, LoadPhase, RELATED_PRODUCTS_LIMIT};
pub use config::{AppConfig, ConfigError, CONFIG_PATH_ENV};
pub use holder::StateHolder;
