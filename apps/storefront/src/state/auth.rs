//! Snapshot rendered by the Account screen.

use flash_core::MIN_PASSWORD_LENGTH;
use flash_remote::AuthUser;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthViewState {
    pub email: String,
    /// Never serialized into snapshots.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password: String,
    pub is_sign_up_mode: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_user: Option<AuthUser>,
    pub is_email_verified: bool,
}

impl AuthViewState {
    /// Whether the submit button is enabled.
    pub fn is_form_valid(&self) -> bool {
        !self.email.trim().is_empty()
            && !self.password.trim().is_empty()
            && (!self.is_sign_up_mode || self.password.chars().count() >= MIN_PASSWORD_LENGTH)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn with_email(&self, email: &str) -> Self {
        AuthViewState {
            email: email.to_string(),
            ..self.clone()
        }
    }

    pub fn with_password(&self, password: &str) -> Self {
        AuthViewState {
            password: password.to_string(),
            ..self.clone()
        }
    }

    /// Flips between sign-in and sign-up, dropping any error.
    pub fn toggled(&self) -> Self {
        AuthViewState {
            is_sign_up_mode: !self.is_sign_up_mode,
            error: None,
            ..self.clone()
        }
    }

    pub fn loading(&self) -> Self {
        AuthViewState {
            is_loading: true,
            error: None,
            ..self.clone()
        }
    }

    pub fn signed_in(&self, user: AuthUser) -> Self {
        AuthViewState {
            is_loading: false,
            error: None,
            is_email_verified: user.email_verified,
            current_user: Some(user),
            ..self.clone()
        }
    }

    pub fn with_user(&self, user: AuthUser) -> Self {
        AuthViewState {
            is_email_verified: user.email_verified,
            current_user: Some(user),
            ..self.clone()
        }
    }

    pub fn with_error(&self, message: impl Into<String>) -> Self {
        AuthViewState {
            is_loading: false,
            error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn without_error(&self) -> Self {
        AuthViewState {
            error: None,
            ..self.clone()
        }
    }
}
