//! # flash-remote: Remote Collaborators for the Flash Storefront
//!
//! The catalog and identity contracts the storefront depends on, plus their
//! implementations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          flash-remote                                   │
//! │                                                                         │
//! │   CatalogService (trait)                IdentityService (trait)         │
//! │   ├── FirestoreClient   REST v1         ├── FirebaseAuthClient          │
//! │   └── DemoCatalog       static          └── InMemoryIdentity            │
//! │                                                                         │
//! │   Every catalog call takes a CancellationToken and resolves to          │
//! │   RemoteError::Cancelled once the token fires.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`catalog`] - `CatalogService` trait and `run_cancellable`
//! - [`identity`] - `IdentityService` trait, sessions and provider error codes
//! - [`config`] - Firebase project settings shared by both REST clients
//! - [`firestore`] - Firestore REST client and document decoding
//! - [`firebase_auth`] - Identity Toolkit / Secure Token REST client
//! - [`demo`] - Built-in catalog and in-memory accounts
//! - [`error`] - `RemoteError`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flash_remote::{CatalogService, FirebaseConfig, FirestoreClient};
//! use tokio_util::sync::CancellationToken;
//!
//! let catalog = FirestoreClient::new(FirebaseConfig::new("flash-store", api_key))?;
//! let token = CancellationToken::new();
//! let shirts = catalog.list_products("Shirts", &token).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod demo;
pub mod error;
pub mod firebase_auth;
pub mod firestore;
pub mod identity;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{run_cancellable, CatalogService};
pub use config::FirebaseConfig;
pub use demo::{DemoCatalog, InMemoryIdentity};
pub use error::{RemoteError, RemoteResult};
pub use firebase_auth::FirebaseAuthClient;
pub use firestore::FirestoreClient;
pub use identity::{AuthErrorCode, AuthSession, AuthUser, IdentityService};

/// Cancellation primitive used by every catalog call.
pub use tokio_util::sync::CancellationToken;
