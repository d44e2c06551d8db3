//! # Remote Error Types
//!
//! Error types for catalog and identity calls.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Remote Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  NotFound               │ │
//! │  │                 │  │  Cancelled      │  │  Unauthorized           │ │
//! │  │                 │  │                 │  │  UnexpectedStatus       │ │
//! │  │                 │  │                 │  │  InvalidResponse        │ │
//! │  │                 │  │                 │  │  PaginationLimit        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Auth { code: AuthErrorCode } - identity provider rejections    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::identity::AuthErrorCode;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of a call to a remote collaborator.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Invalid client configuration (missing project id, bad URL, ...).
    #[error("Invalid remote configuration: {0}")]
    InvalidConfig(String),

    /// Network, TLS or timeout failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller cancelled the request before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The requested document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the credentials or API key.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The body could not be decoded into the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Paged listing never terminated.
    #[error("Pagination limit reached for {collection}: exceeded {max_pages} pages")]
    PaginationLimit { collection: String, max_pages: usize },

    /// The identity provider rejected the request.
    #[error("{}", .code.message())]
    Auth { code: AuthErrorCode },
}

impl RemoteError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RemoteError::Cancelled)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, RemoteError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }

    /// Text suitable for an on-screen error banner.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Network(_) => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            RemoteError::NotFound(what) => format!("{what} could not be found."),
            other => other.to_string(),
        }
    }
}
