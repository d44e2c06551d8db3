//! # Identity Service
//!
//! Email/password accounts: sign-up, sign-in, verification email, profile
//! lookup, token refresh and sign-out.
//!
//! ## Authentication Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Email Authentication Flow                          │
//! │                                                                         │
//! │  storefront                 IdentityService            provider         │
//! │  ──────────                 ───────────────            ────────         │
//! │  authenticate() ──sign_up──► accounts:signUp ─────────► new account     │
//! │                 ◄── AuthSession (idToken, refreshToken, expiresAt)      │
//! │                 ──send_verification_email──► accounts:sendOobCode       │
//! │                                                                         │
//! │  [user clicks the emailed link]                                         │
//! │                                                                         │
//! │  refresh_user() ──lookup──► accounts:lookup ──► emailVerified = true    │
//! │                                                                         │
//! │  [token near expiry]                                                    │
//! │  ──refresh──► v1/token (grant_type=refresh_token) ──► new AuthSession   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::RemoteResult;

/// Refresh this long before the id token expires.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
}

/// Credentials returned by a successful sign-up, sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Builds a session whose token expires `expires_in_secs` after `now`.
    pub fn issued_at(
        user: AuthUser,
        id_token: String,
        refresh_token: String,
        now: DateTime<Utc>,
        expires_in_secs: i64,
    ) -> Self {
        AuthSession {
            user,
            id_token,
            refresh_token,
            expires_at: now + Duration::seconds(expires_in_secs),
        }
    }

    /// True when the token is expired or within the refresh margin.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Provider rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailExists,
    InvalidCredentials,
    InvalidEmail,
    WeakPassword,
    MissingEmail,
    MissingPassword,
    UserDisabled,
    TooManyAttempts,
    OperationNotAllowed,
    /// Id or refresh token is invalid, expired or for a deleted user.
    InvalidToken,
    /// A code this client does not know.
    Other(String),
}

impl AuthErrorCode {
    /// Parses the provider's `error.message` field.
    ///
    /// Messages may carry a detail suffix, e.g.
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    pub fn from_provider(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or_default().trim();
        match code {
            "EMAIL_EXISTS" => AuthErrorCode::EmailExists,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                AuthErrorCode::InvalidCredentials
            }
            "INVALID_EMAIL" => AuthErrorCode::InvalidEmail,
            "WEAK_PASSWORD" => AuthErrorCode::WeakPassword,
            "MISSING_EMAIL" => AuthErrorCode::MissingEmail,
            "MISSING_PASSWORD" => AuthErrorCode::MissingPassword,
            "USER_DISABLED" => AuthErrorCode::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthErrorCode::TooManyAttempts,
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
                AuthErrorCode::OperationNotAllowed
            }
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "INVALID_REFRESH_TOKEN" => {
                AuthErrorCode::InvalidToken
            }
            other => AuthErrorCode::Other(other.to_string()),
        }
    }

    /// Human-readable message shown in the auth form.
    pub fn message(&self) -> String {
        match self {
            AuthErrorCode::EmailExists => {
                "The email address is already in use by another account.".to_string()
            }
            AuthErrorCode::InvalidCredentials => {
                "The supplied auth credential is incorrect, malformed or has expired.".to_string()
            }
            AuthErrorCode::InvalidEmail => "The email address is badly formatted.".to_string(),
            AuthErrorCode::WeakPassword => {
                "The given password is invalid. Password should be at least 6 characters."
                    .to_string()
            }
            AuthErrorCode::MissingEmail => "An email address must be provided.".to_string(),
            AuthErrorCode::MissingPassword => "A password must be provided.".to_string(),
            AuthErrorCode::UserDisabled => {
                "The user account has been disabled by an administrator.".to_string()
            }
            AuthErrorCode::TooManyAttempts => {
                "We have blocked all requests from this device due to unusual activity. Try again later."
                    .to_string()
            }
            AuthErrorCode::OperationNotAllowed => {
                "Email/password sign-in is not enabled for this project.".to_string()
            }
            AuthErrorCode::InvalidToken => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthErrorCode::Other(code) => format!("Authentication failed ({code})."),
        }
    }
}

/// Account operations against an identity provider.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> RemoteResult<AuthSession>;

    /// Signs an existing account in.
    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<AuthSession>;

    /// Emails a verification link to the session's user.
    async fn send_verification_email(&self, session: &AuthSession) -> RemoteResult<()>;

    /// Reloads the session's user (verification status may have changed).
    async fn lookup(&self, session: &AuthSession) -> RemoteResult<AuthUser>;

    /// Exchanges the refresh token for a fresh id token.
    async fn refresh(&self, session: &AuthSession) -> RemoteResult<AuthSession>;

    /// Ends the session. Token-based providers only drop local state.
    async fn sign_out(&self, _session: &AuthSession) -> RemoteResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(now: DateTime<Utc>, expires_in: i64) -> AuthSession {
        AuthSession::issued_at(
            AuthUser {
                uid: "u1".into(),
                email: "demo@email.com".into(),
                email_verified: false,
            },
            "id".into(),
            "refresh".into(),
            now,
            expires_in,
        )
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let now = Utc::now();
        assert!(!session(now, 3600).needs_refresh(now));
        assert!(session(now, 120).needs_refresh(now));
        assert!(!session(now, 120).is_expired(now));
        assert!(session(now, 0).is_expired(now));
    }

    #[test]
    fn test_from_provider_strips_detail() {
        assert_eq!(
            AuthErrorCode::from_provider("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            AuthErrorCode::from_provider("INVALID_LOGIN_CREDENTIALS"),
            AuthErrorCode::InvalidCredentials
        );
        assert_eq!(
            AuthErrorCode::from_provider("EMAIL_NOT_FOUND"),
            AuthErrorCode::InvalidCredentials
        );
        assert_eq!(
            AuthErrorCode::from_provider("TOKEN_EXPIRED"),
            AuthErrorCode::InvalidToken
        );
        assert_eq!(
            AuthErrorCode::from_provider("QUOTA_EXCEEDED"),
            AuthErrorCode::Other("QUOTA_EXCEEDED".into())
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AuthErrorCode::EmailExists.message(),
            "The email address is already in use by another account."
        );
        assert_eq!(
            AuthErrorCode::Other("X".into()).message(),
            "Authentication failed (X)."
        );
    }
}
