//! HTTP route handlers for the accounts API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Banner ("Backend is running")
//! GET  /health        - Liveness
//! GET  /health/ready  - Readiness (store ping)
//!
//! POST /signup        - Register an account
//! POST /login         - Exchange credentials for a bearer token
//!
//! # Profile (requires bearer token)
//! GET  /profile       - Current account
//! PUT  /profile       - Merge profile fields
//! ```

pub mod auth;
pub mod home;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the full accounts router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/profile", get(profile::show).put(profile::update))
}
