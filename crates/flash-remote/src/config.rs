//! # Firebase Configuration
//!
//! Connection settings shared by the Firestore and Firebase Auth clients.
//!
//! ## Configuration File Format
//! ```toml
//! [firebase]
//! project_id = "flash-store"
//! api_key = "AIza..."
//! # Optional overrides (emulators, tests)
//! firestore_url = "https://firestore.googleapis.com"
//! auth_url = "https://identitytoolkit.googleapis.com"
//! token_url = "https://securetoken.googleapis.com"
//! timeout_secs = 15
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings for one Firebase project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Firebase / GCP project id.
    pub project_id: String,

    /// Web API key, sent as the `key` query parameter.
    pub api_key: String,

    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_firestore_url() -> String {
    DEFAULT_FIRESTORE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl FirebaseConfig {
    /// Creates a config pointing at the production Google endpoints.
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        FirebaseConfig {
            project_id: project_id.into(),
            api_key: api_key.into(),
            firestore_url: default_firestore_url(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Points every endpoint at one base URL (emulator or mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        self.firestore_url = base.clone();
        self.auth_url = base.clone();
        self.token_url = base;
        self
    }

    /// Checks that required fields are present and URLs are absolute.
    pub fn validate(&self) -> RemoteResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(RemoteError::InvalidConfig(
                "firebase.project_id is required".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(RemoteError::InvalidConfig(
                "firebase.api_key is required".to_string(),
            ));
        }
        for (field, url) in [
            ("firestore_url", &self.firestore_url),
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RemoteError::InvalidConfig(format!(
                    "firebase.{field} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(RemoteError::InvalidConfig(
                "firebase.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Root of the default database's document tree.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.firestore_url.trim_end_matches('/'),
            self.project_id
        )
    }

    /// Builds the HTTP client used by both REST clients.
    pub(crate) fn http_client(&self) -> RemoteResult<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("flash-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
