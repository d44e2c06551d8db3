//! # Flash Storefront Library
//!
//! The storefront application: view state, controllers, navigation and the
//! terminal shell that renders them.
//!
//! ## Module Organization
//! ```text
//! flash_storefront/
//! ├── lib.rs          ◄─── You are here (Storefront wiring & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── holder.rs   ◄─── Observable snapshot holder (watch channel)
//! │   ├── catalog.rs  ◄─── Start / Items / Product Details view state
//! │   ├── auth.rs     ◄─── Account view state
//! │   ├── cart.rs     ◄─── Cart state and render view
//! │   └── config.rs   ◄─── AppConfig (file + env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── CatalogController
//! │   ├── auth.rs     ◄─── AuthController
//! │   └── cart.rs     ◄─── Cart commands
//! ├── navigation.rs   ◄─── Screens and the back stack
//! ├── shell.rs        ◄─── Line-oriented interactive shell
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Backend Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig.firebase                                                     │
//! │     │                                                                   │
//! │     ├── Some(cfg) ──► FirestoreClient   + FirebaseAuthClient            │
//! │     │                                                                   │
//! │     └── None ───────► DemoCatalog       + InMemoryIdentity              │
//! │                       (demo@email.com / password123 preloaded)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod navigation;
pub mod shell;
pub mod state;

use std::sync::Arc;

use flash_remote::{
    CatalogService, DemoCatalog, FirebaseAuthClient, FirestoreClient, IdentityService,
    InMemoryIdentity,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{AuthController, CatalogController, DEMO_EMAIL, DEMO_PASSWORD};
use error::ApiError;
use state::{AppConfig, CartState};

/// Everything one storefront session owns.
pub struct Storefront {
    pub config: AppConfig,
    pub catalog: CatalogController,
    pub auth: AuthController,
    pub cart: CartState,
}

impl Storefront {
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogService>,
        identity: Arc<dyn IdentityService>,
    ) -> Self {
        Storefront {
            config,
            catalog: CatalogController::new(catalog),
            auth: AuthController::new(identity),
            cart: CartState::new(),
        }
    }

    /// Builds the Firebase backend when configured, the demo backend
    /// otherwise.
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let (catalog, identity): (Arc<dyn CatalogService>, Arc<dyn IdentityService>) =
            match &config.firebase {
                Some(firebase) => {
                    info!(project_id = %firebase.project_id, "Using Firebase backend");
                    (
                        Arc::new(FirestoreClient::new(firebase.clone())?),
                        Arc::new(FirebaseAuthClient::new(firebase.clone())?),
                    )
                }
                None => {
                    info!("No Firebase project configured, using the demo catalog");
                    (
                        Arc::new(DemoCatalog::new()),
                        Arc::new(InMemoryIdentity::with_account(DEMO_EMAIL, DEMO_PASSWORD)),
                    )
                }
            };

        Ok(Self::new(config, catalog, identity))
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with shell output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=flash=trace` - Show trace for flash crates only
/// - Default: `info,flash=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flash=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_backend_without_firebase() {
        let storefront = Storefront::from_config(AppConfig::default()).unwrap();
        assert!(storefront.config.is_demo());
        assert!(storefront.cart.view().is_empty());
    }

    #[test]
    fn test_invalid_firebase_config_is_rejected() {
        let config = AppConfig {
            firebase: Some(flash_remote::FirebaseConfig::new("", "")),
            ..AppConfig::default()
        };
        assert!(Storefront::from_config(config).is_err());
    }

    #[tokio::test]
    async fn test_demo_account_signs_in() {
        let storefront = Storefront::from_config(AppConfig::default()).unwrap();
        storefront.auth.fill_demo_credentials();
        let user = storefront.auth.authenticate().await.unwrap();
        assert_eq!(user.email, DEMO_EMAIL);
    }
}
