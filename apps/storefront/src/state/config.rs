//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file: `--config`, then `FLASH_CONFIG`, then
//!    `<platform config dir>/config.toml`
//! 3. Environment variables (`FLASH_*`)
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Quarkz"
//! currency_symbol = "$"
//! currency_decimals = 2
//!
//! # Omit this section to run against the built-in demo catalog.
//! [firebase]
//! project_id = "flash-store"
//! api_key = "AIza..."
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after loading, so no lock is needed.

use std::path::{Path, PathBuf};

use flash_core::Money;
use flash_remote::FirebaseConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "FLASH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shown on the start screen.
    pub store_name: String,

    pub currency_symbol: String,

    /// Decimal places shown for prices.
    pub currency_decimals: u8,

    /// Remote backend. `None` runs the demo catalog and in-memory accounts.
    pub firebase: Option<FirebaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: "Quarkz".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            firebase: None,
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the config file, then `FLASH_*` overrides.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `FLASH_*` overrides read through `lookup`.
    ///
    /// A project id and api key together enable Firebase even without a
    /// `[firebase]` section in the file.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("FLASH_STORE_NAME") {
            self.store_name = name;
        }

        let project_id = lookup("FLASH_FIREBASE_PROJECT_ID");
        let api_key = lookup("FLASH_FIREBASE_API_KEY");
        match self.firebase {
            Some(ref mut firebase) => {
                if let Some(project_id) = project_id {
                    firebase.project_id = project_id;
                }
                if let Some(api_key) = api_key {
                    firebase.api_key = api_key;
                }
            }
            None => {
                if let (Some(project_id), Some(api_key)) = (project_id, api_key) {
                    debug!(%project_id, "Enabling Firebase from environment");
                    self.firebase = Some(FirebaseConfig::new(project_id, api_key));
                }
            }
        }

        if let Some(timeout) = lookup("FLASH_HTTP_TIMEOUT_SECS").and_then(|t| t.parse().ok()) {
            if let Some(firebase) = self.firebase.as_mut() {
                firebase.timeout_secs = timeout;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }
        if self.currency_decimals > 4 {
            return Err(ConfigError::Invalid(
                "currency_decimals must be between 0 and 4".into(),
            ));
        }
        if let Some(firebase) = &self.firebase {
            firebase
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    pub fn is_demo(&self) -> bool {
        self.firebase.is_none()
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "flash", "storefront")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Formats a cent amount as a currency string.
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}
