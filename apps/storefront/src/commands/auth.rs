//! # Auth Commands
//!
//! Drives the Account screen: the sign-in / sign-up form, verification
//! email and sign-out.
//!
//! ## Form Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_email / update_password / toggle_auth_mode                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  authenticate()                                                         │
//! │   1. trim both fields                                                   │
//! │   2. empty?                 ──► "Email and password cannot be empty."   │
//! │   3. sign-up and too short? ──► "Password must be at least 6 ..."       │
//! │   4. loading, then sign_up() or sign_in()                               │
//! │   5. sign-up: send the verification email (failure only logged)         │
//! │   6. success ──► signed_in(user)   failure ──► with_error(message)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use flash_core::MIN_PASSWORD_LENGTH;
use flash_remote::{AuthSession, AuthUser, IdentityService, RemoteError};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{AuthViewState, StateHolder};

/// Credentials filled in by the "use demo account" shortcut.
pub const DEMO_EMAIL: &str = "demo@email.com";
pub const DEMO_PASSWORD: &str = "password123";

const EMPTY_CREDENTIALS: &str = "Email and password cannot be empty.";
const SIGN_UP_FAILED: &str = "Sign up failed. Please try again.";
const SIGN_IN_FAILED: &str = "Login failed. Please check your credentials.";

pub struct AuthController {
    identity: Arc<dyn IdentityService>,
    state: StateHolder<AuthViewState>,
    session: Mutex<Option<AuthSession>>,
}

impl AuthController {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        AuthController {
            identity,
            state: StateHolder::default(),
            session: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> AuthViewState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthViewState> {
        self.state.subscribe()
    }

    pub fn is_form_valid(&self) -> bool {
        self.state.with(AuthViewState::is_form_valid)
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.with(|state| state.current_user.clone())
    }

    // =========================================================================
    // Form edits
    // =========================================================================

    pub fn update_email(&self, email: &str) {
        self.state.replace(|state| state.with_email(email));
    }

    pub fn update_password(&self, password: &str) {
        self.state.replace(|state| state.with_password(password));
    }

    pub fn toggle_auth_mode(&self) {
        self.state.replace(AuthViewState::toggled);
    }

    /// Switches to the given mode; no-op if already there.
    pub fn set_sign_up_mode(&self, sign_up: bool) {
        self.state.replace_if(|state| (state.is_sign_up_mode != sign_up).then(|| state.toggled()));
    }

    pub fn clear_error(&self) {
        self.state.replace(AuthViewState::without_error);
    }

    pub fn fill_demo_credentials(&self) {
        self.state
            .replace(|state| state.with_email(DEMO_EMAIL).with_password(DEMO_PASSWORD));
    }

    // =========================================================================
    // Provider calls
    // =========================================================================

    /// Submits the form in its current mode.
    pub async fn authenticate(&self) -> Result<AuthUser, ApiError> {
        let form = self.state.snapshot();
        let email = form.email.trim().to_string();
        let password = form.password.trim().to_string();
        let sign_up = form.is_sign_up_mode;

        if email.is_empty() || password.is_empty() {
            return Err(self.fail(ApiError::validation(EMPTY_CREDENTIALS)));
        }
        if sign_up && password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(self.fail(ApiError::validation(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            ))));
        }

        self.state.replace(AuthViewState::loading);
        debug!(sign_up, "Authenticating");

        let result = if sign_up {
            self.identity.sign_up(&email, &password).await
        } else {
            self.identity.sign_in(&email, &password).await
        };

        let session = match result {
            Ok(session) => session,
            Err(err) => {
                let fallback = if sign_up { SIGN_UP_FAILED } else { SIGN_IN_FAILED };
                warn!(error = %err, sign_up, "Authentication failed");
                return Err(self.fail(provider_error(err, fallback)));
            }
        };

        if sign_up {
            if let Err(err) = self.identity.send_verification_email(&session).await {
                warn!(error = %err, "Verification email could not be sent");
            }
        }

        let user = session.user.clone();
        *self.session.lock().await = Some(session);
        self.state.replace(|state| state.signed_in(user.clone()));
        info!(uid = %user.uid, sign_up, "Signed in");
        Ok(user)
    }

    pub async fn resend_verification_email(&self) -> Result<(), ApiError> {
        let session = self.require_session().await?;
        self.identity
            .send_verification_email(&session)
            .await
            .map_err(|err| self.fail(ApiError::from(err)))?;
        info!(email = %session.user.email, "Verification email sent");
        Ok(())
    }

    /// Reloads the user so a verification done elsewhere shows up. The id
    /// token is refreshed first when it is close to expiry.
    pub async fn refresh_user(&self) -> Result<AuthUser, ApiError> {
        let mut session = self.require_session().await?;

        if session.needs_refresh(Utc::now()) {
            debug!("Refreshing id token");
            session = self
                .identity
                .refresh(&session)
                .await
                .map_err(|err| self.fail(ApiError::from(err)))?;
        }

        let user = self
            .identity
            .lookup(&session)
            .await
            .map_err(|err| self.fail(ApiError::from(err)))?;

        session.user = user.clone();
        *self.session.lock().await = Some(session);
        self.state.replace(|state| state.with_user(user.clone()));
        debug!(verified = user.email_verified, "User reloaded");
        Ok(user)
    }

    /// Ends the session and resets the form.
    pub async fn sign_out(&self) {
        if let Some(session) = self.session.lock().await.take() {
            if let Err(err) = self.identity.sign_out(&session).await {
                warn!(error = %err, "Provider sign-out failed");
            }
            info!(uid = %session.user.uid, "Signed out");
        }
        self.state.replace(|_| AuthViewState::default());
    }

    async fn require_session(&self) -> Result<AuthSession, ApiError> {
        self.session
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::new(ErrorCode::Unauthorized, "Sign in first."))
    }

    /// Shows `err` on the form and hands it back.
    fn fail(&self, err: ApiError) -> ApiError {
        self.state.replace(|state| state.with_error(err.message.clone()));
        err
    }
}

/// Provider rejections and network failures carry a readable message; any
/// other failure shows `fallback`.
fn provider_error(err: RemoteError, fallback: &str) -> ApiError {
    let readable = matches!(err, RemoteError::Auth { .. } | RemoteError::Network(_));
    let api = ApiError::from(err);
    if readable {
        api
    } else {
        ApiError::new(api.code, fallback)
    }
}
