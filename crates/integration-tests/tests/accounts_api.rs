//! Integration tests for the accounts HTTP API.
//!
//! Drives the full router, middleware included, over the in-memory store.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{TimeDelta, Utc};
use serde_json::json;

use cpath_core::AccountId;
use cpath_integration_tests::TestApp;

// =============================================================================
// Root and Health
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "Backend is running");
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new();

    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.text(), "ok");

    let ready = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let app = TestApp::new();

    let generated = app.request(Method::GET, "/health", None, None).await;
    let id = generated.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "upstream-123")
        .body(Body::empty())
        .unwrap();
    let propagated = app.send(request).await;
    assert_eq!(
        propagated.headers.get("x-request-id").unwrap(),
        "upstream-123"
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

// =============================================================================
// Signup
// =============================================================================

#[tokio::test]
async fn test_signup_returns_record_with_hashed_password() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({
                "name": "Ada",
                "email": "a@b.com",
                "password": "pw",
                "country": "UK",
                "city": "London",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["city"], "London");
    assert!(body["state"].is_null());
    assert!(body["id"].is_i64());
    let password = body["password"].as_str().unwrap();
    assert_ne!(password, "pw");
    assert!(password.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_signup_numeric_phone_stored_as_text() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({ "email": "a@b.com", "password": "pw", "phone": 5_551_234 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    assert_eq!(response.json()["phone"], "5551234");

    let token = app.login("a@b.com", "pw").await;
    let response = app
        .request(
            Method::PUT,
            "/profile",
            Some(&token),
            Some(&json!({ "address": 42 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["address"], "42");
    assert_eq!(response.json()["phone"], "5551234");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new();
    app.signup("a@b.com", "pw").await;

    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({ "email": "a@b.com", "password": "other" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "message": "User already exists" }));
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_differs_only_in_case() {
    let app = TestApp::new();
    app.signup("a@b.com", "pw").await;

    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({ "email": " A@B.com ", "password": "pw" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "User already exists");
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let app = TestApp::new();

    let response = app
        .request(Method::POST, "/signup", None, Some(&json!({ "password": "pw" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "email is required");

    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({ "email": "a@b.com", "password": "" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "password is required");

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(&json!({ "email": "not-an-email", "password": "pw" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Invalid email address");
}

#[tokio::test]
async fn test_signup_malformed_json() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].is_string());
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_issues_token_for_same_account() {
    let app = TestApp::new();
    let account = app.signup("a@b.com", "pw").await;
    let token = app.login("a@b.com", "pw").await;

    let account_id = app.state.tokens().verify(&token).unwrap();
    assert_eq!(i64::from(account_id.as_i32()), account["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email() {
    let app = TestApp::new();
    app.signup("a@b.com", "pw").await;

    for body in [
        json!({ "email": "a@b.com", "password": "wrong" }),
        json!({ "email": "nobody@b.com", "password": "pw" }),
    ] {
        let response = app.request(Method::POST, "/login", None, Some(&body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json(), json!({ "message": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = TestApp::new();
    let response = app
        .request(Method::POST, "/login", None, Some(&json!({ "email": "a@b.com" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "password is required");
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_register_login_profile_flow() {
    let app = TestApp::new();
    app.signup("a@b.com", "pw").await;
    let token = app.login("a@b.com", "pw").await;

    let response = app.request(Method::GET, "/profile", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["email"], "a@b.com");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/profile", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({ "message": "Unauthorized" }));

    let response = app
        .request(Method::GET, "/profile", Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_rejects_non_bearer_scheme() {
    let app = TestApp::new();
    app.signup("a@b.com", "pw").await;
    let token = app.login("a@b.com", "pw").await;

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_expired_token() {
    let app = TestApp::new();
    let account = app.signup("a@b.com", "pw").await;
    let id = AccountId::new(i32::try_from(account["id"].as_i64().unwrap()).unwrap());

    let token = app
        .state
        .tokens()
        .issue_at(id, Utc::now() - TimeDelta::hours(2))
        .unwrap();
    let response = app.request(Method::GET, "/profile", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_for_vanished_account() {
    let app = TestApp::new();
    let token = app.state.tokens().issue(AccountId::new(999)).unwrap();

    let response = app.request(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "message": "User not found" }));

    let response = app
        .request(
            Method::PUT,
            "/profile",
            Some(&token),
            Some(&json!({ "city": "X" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile_merges_single_field() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/signup",
        None,
        Some(&json!({
            "name": "Ada",
            "email": "a@b.com",
            "password": "pw",
            "city": "London",
            "phone": "555",
        })),
    )
    .await;
    let token = app.login("a@b.com", "pw").await;

    let response = app
        .request(
            Method::PUT,
            "/profile",
            Some(&token),
            Some(&json!({ "city": "X" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["city"], "X");
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["phone"], "555");
    assert_eq!(body["email"], "a@b.com");

    let fetched = app.request(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(fetched.json()["city"], "X");
}

#[tokio::test]
async fn test_update_profile_ignores_email_and_password() {
    let app = TestApp::new();
    let account = app.signup("a@b.com", "pw").await;
    let token = app.login("a@b.com", "pw").await;

    let response = app
        .request(
            Method::PUT,
            "/profile",
            Some(&token),
            Some(&json!({ "email": "evil@b.com", "password": "hijack", "id": 42 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["password"], account["password"]);
    assert_eq!(body["id"], account["id"]);

    // Old credentials still work, new ones do not
    app.login("a@b.com", "pw").await;
    let response = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(&json!({ "email": "evil@b.com", "password": "hijack" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile_requires_token() {
    let app = TestApp::new();
    let response = app
        .request(Method::PUT, "/profile", None, Some(&json!({ "city": "X" })))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
