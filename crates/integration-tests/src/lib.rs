//! Integration tests for the Cpath accounts API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router tests (no database needed)
//! cargo test -p cpath-integration-tests
//!
//! # Live tests against a running server and database
//! cargo run -p cpath-cli -- migrate
//! cargo run -p cpath-accounts &
//! ACCOUNTS_URL=http://127.0.0.1:5000 cargo test -p cpath-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `accounts_api` - Full router over the in-memory store via `oneshot`
//! - `live_accounts` - Real HTTP against a running server (`#[ignore]`d)

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cpath_accounts::config::AccountsConfig;
use cpath_accounts::db::MemoryAccountStore;
use cpath_accounts::state::AppState;

/// A signing secret that passes the startup strength checks.
pub const TEST_JWT_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Default base URL for live tests.
pub const DEFAULT_ACCOUNTS_URL: &str = "http://127.0.0.1:5000";

/// Configuration with only the signing secret set.
pub fn test_config() -> AccountsConfig {
    AccountsConfig::from_lookup(|key| (key == "JWT_SECRET").then(|| TEST_JWT_SECRET.to_string()))
        .unwrap()
}

/// In-process application over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryAccountStore>,
}

/// A response with its body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let state = AppState::new(&test_config(), store.clone());
        let router = cpath_accounts::app(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    /// Send one request through the full middleware stack.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Send a prebuilt request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register an account and return its JSON record.
    pub async fn signup(&self, email: &str, password: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/signup",
                None,
                Some(&serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(&serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()["token"].as_str().unwrap().to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Base URL of a running accounts server for live tests.
pub fn accounts_url() -> String {
    std::env::var("ACCOUNTS_URL").unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string())
}

/// An email address no other test run has used.
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}
