#![allow(clippy::unwrap_used)]
// Integration tests for `AuthClient` using wiremock.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_api::{
    ApiClient, AuthClient, AuthState, Error, MemorySession, SessionProvider, SignUpRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(session: MemorySession) -> (MockServer, AuthClient, Arc<MemorySession>) {
    let server = MockServer::start().await;
    let session = Arc::new(session);
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        session.clone(),
    );
    (server, AuthClient::new(api), session)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

fn user_json() -> serde_json::Value {
    json!({ "id": 1, "email": "ops@example.com", "fullName": "Ops Admin", "role": "admin" })
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_current_user_resolves() {
    let (server, auth, session) = setup(MemorySession::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "s3cret!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "token": "jwt-abc", "user": user_json() }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .mount(&server)
        .await;

    assert_eq!(auth.state(), AuthState::Anonymous);

    let signed_in = auth.login("ops@example.com", &secret("s3cret!")).await.unwrap();
    assert_eq!(signed_in.user.unwrap().full_name, "Ops Admin");
    assert_eq!(session.token().unwrap().expose_secret(), "jwt-abc");
    assert_eq!(auth.state(), AuthState::Authenticated);

    let me = auth.current_user().await.unwrap().unwrap();
    assert_eq!(me.email, "ops@example.com");
    assert_eq!(me.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_login_failure_reports_server_message() {
    let (server, auth, session) = setup(MemorySession::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let result = auth.login("ops@example.com", &secret("wrong")).await;

    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "Invalid credentials"),
        "expected Authentication error, got: {result:?}"
    );
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_logout_then_current_user_is_none_without_request() {
    let (server, auth, session) = setup(MemorySession::with_token("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .expect(0)
        .mount(&server)
        .await;

    auth.logout().unwrap();

    assert!(session.token().is_none());
    assert_eq!(auth.current_user().await.unwrap(), None);
}

// ── Soft-logout ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_current_user_401_clears_token() {
    let (server, auth, session) = setup(MemorySession::with_token("expired")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expired" })))
        .mount(&server)
        .await;

    assert_eq!(auth.current_user().await.unwrap(), None);
    assert!(session.token().is_none());
    assert_eq!(auth.state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_current_user_server_error_keeps_token() {
    let (server, auth, session) = setup(MemorySession::with_token("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = auth.current_user().await.unwrap_err();

    assert!(matches!(err, Error::Http { status: 503, .. }), "got: {err:?}");
    assert!(session.token().is_some());
}

#[tokio::test]
async fn test_current_user_accepts_nested_user() {
    let (server, auth, _session) = setup(MemorySession::with_token("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": user_json() } })),
        )
        .mount(&server)
        .await;

    let me = auth.current_user().await.unwrap().unwrap();
    assert_eq!(me.id, "1");
}

// ── Password and accounts ───────────────────────────────────────────

#[tokio::test]
async fn test_change_password_requires_token() {
    let (server, auth, _session) = setup(MemorySession::new()).await;

    Mock::given(method("PUT"))
        .and(path("/api/auth/change-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = auth.change_password(&secret("old"), &secret("newpass")).await;
    assert!(matches!(result, Err(Error::Unauthenticated)));
}

#[tokio::test]
async fn test_change_password_sends_camel_case_body() {
    let (server, auth, _session) = setup(MemorySession::with_token("jwt-abc")).await;

    Mock::given(method("PUT"))
        .and(path("/api/auth/change-password"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_json(json!({ "currentPassword": "old-pass", "newPassword": "new-pass" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    auth.change_password(&secret("old-pass"), &secret("new-pass"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_change_password_wrong_current_password() {
    let (server, auth, _session) = setup(MemorySession::with_token("jwt-abc")).await;

    Mock::given(method("PUT"))
        .and(path("/api/auth/change-password"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Current password is incorrect" })),
        )
        .mount(&server)
        .await;

    let err = auth
        .change_password(&secret("bad"), &secret("new-pass"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 400, ref message } if message == "Current password is incorrect")
    );
}

#[tokio::test]
async fn test_sign_up_keeps_operator_token() {
    let (server, auth, session) = setup(MemorySession::with_token("operator")).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_partial_json(json!({
            "username": "New Staff",
            "jobTitle": "Editor",
            "email": "new@example.com",
            "phone": "0500000000"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "token": "new-staff", "user": { "id": 2, "email": "new@example.com" } }
        })))
        .mount(&server)
        .await;

    let created = auth
        .sign_up(&SignUpRequest {
            email: "new@example.com".into(),
            password: secret("hunter22"),
            phone: "0500000000".into(),
            full_name: "New Staff".into(),
            job_title: Some("Editor".into()),
            address: None,
            about: None,
        })
        .await
        .unwrap();

    assert_eq!(created.user.unwrap().email, "new@example.com");
    assert_eq!(session.token().unwrap().expose_secret(), "operator");
}
