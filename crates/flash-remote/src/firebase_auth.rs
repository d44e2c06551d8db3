//! [`IdentityService`] over the Firebase Auth (Identity Toolkit) REST API.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FirebaseConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::identity::{AuthErrorCode, AuthSession, AuthUser, IdentityService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    id_token: String,
    #[serde(default)]
    email: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    id_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdTokenRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

/// Secure token endpoint replies in snake_case.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_expires_in(raw: &str) -> RemoteResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| RemoteError::InvalidResponse(format!("expiresIn is not a number: '{raw}'")))
}

/// Email/password accounts in a Firebase project.
#[derive(Debug, Clone)]
pub struct FirebaseAuthClient {
    client: Client,
    config: FirebaseConfig,
}

impl FirebaseAuthClient {
    pub fn new(config: FirebaseConfig) -> RemoteResult<Self> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(FirebaseAuthClient { client, config })
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{}",
            self.config.auth_url.trim_end_matches('/'),
            method
        )
    }

    fn token_url(&self) -> String {
        format!("{}/v1/token", self.config.token_url.trim_end_matches('/'))
    }

    /// Sends `request` with the api key attached. Provider rejections
    /// become [`RemoteError::Auth`].
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = request
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => {
                    debug!(
                        status = status.as_u16(),
                        message = %envelope.error.message,
                        "Auth request rejected"
                    );
                    Err(RemoteError::Auth {
                        code: AuthErrorCode::from_provider(&envelope.error.message),
                    })
                }
                Err(_) => Err(RemoteError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                }),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::InvalidResponse(format!("{url}: {e}")))
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> RemoteResult<PasswordResponse> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.call(self.client.post(self.accounts_url(method)).json(&body))
            .await
    }
}

fn session_from(response: PasswordResponse) -> RemoteResult<AuthSession> {
    let expires_in = parse_expires_in(&response.expires_in)?;
    Ok(AuthSession::issued_at(
        AuthUser {
            uid: response.local_id,
            email: response.email,
            email_verified: false,
        },
        response.id_token,
        response.refresh_token,
        Utc::now(),
        expires_in,
    ))
}

#[async_trait]
impl IdentityService for FirebaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> RemoteResult<AuthSession> {
        let response = self.password_call("signUp", email, password).await?;
        let session = session_from(response)?;
        info!(uid = %session.user.uid, "Account created");
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<AuthSession> {
        let response = self
            .password_call("signInWithPassword", email, password)
            .await?;
        let mut session = session_from(response)?;

        // The sign-in reply omits verification status.
        match self.lookup(&session).await {
            Ok(user) => session.user.email_verified = user.email_verified,
            Err(e) => warn!(error = %e, "Could not load verification status after sign-in"),
        }

        info!(uid = %session.user.uid, "Signed in");
        Ok(session)
    }

    async fn send_verification_email(&self, session: &AuthSession) -> RemoteResult<()> {
        let body = OobCodeRequest {
            request_type: "VERIFY_EMAIL",
            id_token: &session.id_token,
        };
        let _: serde_json::Value = self
            .call(self.client.post(self.accounts_url("sendOobCode")).json(&body))
            .await?;
        info!(email = %session.user.email, "Verification email sent");
        Ok(())
    }

    async fn lookup(&self, session: &AuthSession) -> RemoteResult<AuthUser> {
        let body = IdTokenRequest {
            id_token: &session.id_token,
        };
        let response: LookupResponse = self
            .call(self.client.post(self.accounts_url("lookup")).json(&body))
            .await?;

        let user = response
            .users
            .into_iter()
            .next()
            .ok_or(RemoteError::Auth {
                code: AuthErrorCode::InvalidToken,
            })?;

        Ok(AuthUser {
            uid: user.local_id,
            email: user.email,
            email_verified: user.email_verified,
        })
    }

    async fn refresh(&self, session: &AuthSession) -> RemoteResult<AuthSession> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", session.refresh_token.as_str()),
        ];
        let response: RefreshResponse = self
            .call(self.client.post(self.token_url()).form(&form))
            .await?;

        let expires_in = parse_expires_in(&response.expires_in)?;
        debug!(uid = %response.user_id, expires_in, "Refreshed id token");

        Ok(AuthSession::issued_at(
            AuthUser {
                uid: response.user_id,
                ..session.user.clone()
            },
            response.id_token,
            response.refresh_token,
            Utc::now(),
            expires_in,
        ))
    }
}
