//! Integration tests for `FirebaseAuthClient` against a `wiremock` stand-in
//! for the Identity Toolkit and Secure Token endpoints.

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flash_remote::{
    AuthErrorCode, AuthSession, AuthUser, FirebaseAuthClient, FirebaseConfig, IdentityService,
    RemoteError,
};

fn client_for(server: &MockServer) -> FirebaseAuthClient {
    let config = FirebaseConfig::new("flash-test", "test-key").with_base_url(server.uri());
    FirebaseAuthClient::new(config).expect("failed to build test FirebaseAuthClient")
}

fn token_response(email: &str) -> serde_json::Value {
    json!({
        "kind": "identitytoolkit#SignupNewUserResponse",
        "idToken": "id-token-1",
        "email": email,
        "refreshToken": "refresh-token-1",
        "expiresIn": "3600",
        "localId": "uid-1"
    })
}

fn provider_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {
            "code": 400,
            "message": message,
            "errors": [{"message": message, "domain": "global", "reason": "invalid"}]
        }
    }))
}

fn session() -> AuthSession {
    AuthSession::issued_at(
        AuthUser {
            uid: "uid-1".into(),
            email: "shopper@flash.dev".into(),
            email_verified: false,
        },
        "id-token-1".into(),
        "refresh-token-1".into(),
        Utc::now(),
        3600,
    )
}

#[tokio::test]
async fn sign_up_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "email": "shopper@flash.dev",
            "password": "secret1",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("shopper@flash.dev")))
        .expect(1)
        .mount(&server)
        .await;

    let before = Utc::now();
    let session = client_for(&server)
        .sign_up("shopper@flash.dev", "secret1")
        .await
        .expect("sign-up should succeed");

    assert_eq!(session.user.uid, "uid-1");
    assert_eq!(session.user.email, "shopper@flash.dev");
    assert!(!session.user.email_verified);
    assert_eq!(session.id_token, "id-token-1");
    assert!(session.expires_at > before + chrono::Duration::seconds(3500));
    assert!(!session.needs_refresh(Utc::now()));
}

#[tokio::test]
async fn sign_up_with_existing_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(provider_error("EMAIL_EXISTS"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_up("taken@flash.dev", "secret1")
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        RemoteError::Auth {
            code: AuthErrorCode::EmailExists
        }
    ));
    assert_eq!(
        err.to_string(),
        "The email address is already in use by another account."
    );
}

#[tokio::test]
async fn sign_up_with_weak_password_detail_suffix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(provider_error(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_up("shopper@flash.dev", "12345")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Auth {
            code: AuthErrorCode::WeakPassword
        }
    ));
}

#[tokio::test]
async fn sign_in_loads_verification_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("shopper@flash.dev")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .and(body_json(json!({"idToken": "id-token-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"localId": "uid-1", "email": "shopper@flash.dev", "emailVerified": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_in("shopper@flash.dev", "secret1")
        .await
        .expect("sign-in should succeed");
    assert!(session.user.email_verified);
}

#[tokio::test]
async fn sign_in_survives_failed_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("shopper@flash.dev")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_in("shopper@flash.dev", "secret1")
        .await
        .expect("lookup failure should not fail sign-in");
    assert!(!session.user.email_verified);
}

#[tokio::test]
async fn sign_in_with_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(provider_error("INVALID_LOGIN_CREDENTIALS"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in("shopper@flash.dev", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Auth {
            code: AuthErrorCode::InvalidCredentials
        }
    ));
}

#[tokio::test]
async fn send_verification_email_posts_oob_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .and(body_json(json!({"requestType": "VERIFY_EMAIL", "idToken": "id-token-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "shopper@flash.dev"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .send_verification_email(&session())
        .await
        .expect("verification email should be sent");
}

#[tokio::test]
async fn lookup_with_no_users_is_invalid_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "identitytoolkit#GetAccountInfoResponse"})))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup(&session()).await.unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Auth {
            code: AuthErrorCode::InvalidToken
        }
    ));
}

#[tokio::test]
async fn refresh_exchanges_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "id-token-2",
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "refresh-token-2",
            "id_token": "id-token-2",
            "user_id": "uid-1",
            "project_id": "1234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let old = session();
    let refreshed = client_for(&server)
        .refresh(&old)
        .await
        .expect("refresh should succeed");

    assert_eq!(refreshed.id_token, "id-token-2");
    assert_eq!(refreshed.refresh_token, "refresh-token-2");
    assert_eq!(refreshed.user.email, old.user.email);
    assert!(refreshed.expires_at >= old.expires_at);
}

#[tokio::test]
async fn unparseable_error_body_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in("shopper@flash.dev", "secret1")
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::UnexpectedStatus { status: 502, .. }),
        "got {err:?}"
    );
}
