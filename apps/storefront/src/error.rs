//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Shell                       Controllers                                │
//! │  ─────                       ───────────                                │
//! │                                                                         │
//! │  "open 2"                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command method -> Result<T, ApiError>                           │  │
//! │  │         │                                                        │  │
//! │  │  Remote error? ─── RemoteError::NotFound("...") ──┐             │  │
//! │  │         │                                         │             │  │
//! │  │  Domain error? ─── CoreError::OutOfStock ──────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Shell prints: "Error: Product gone could not be found."               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use flash_core::CoreError;
use flash_remote::RemoteError;
use serde::Serialize;
use ts_rs::TS;

use crate::state::ConfigError;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product p-9 could not be found."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message shown on screen
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Document or selection does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Credentials or API key refused
    Unauthorized,

    /// Backend unreachable
    NetworkError,

    /// Backend answered with something unusable
    RemoteError,

    /// A newer request superseded this one
    Cancelled,

    /// Bad or missing configuration
    ConfigError,

    /// Cart operation failed
    CartError,

    /// Requested size has no stock
    OutOfStock,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownSize { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts remote errors to API errors.
impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        let code = match &err {
            RemoteError::NotFound(_) => ErrorCode::NotFound,
            RemoteError::Unauthorized(_) => ErrorCode::Unauthorized,
            RemoteError::Network(_) => ErrorCode::NetworkError,
            RemoteError::Cancelled => ErrorCode::Cancelled,
            RemoteError::Auth { .. } => ErrorCode::ValidationError,
            RemoteError::InvalidConfig(_) => ErrorCode::ConfigError,
            RemoteError::UnexpectedStatus { .. }
            | RemoteError::InvalidResponse(_)
            | RemoteError::PaginationLimit { .. } => {
                tracing::error!(error = %err, "Remote call failed");
                ErrorCode::RemoteError
            }
        };
        ApiError::new(code, err.user_message())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
