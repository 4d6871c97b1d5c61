//! Registration and login handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::account::scalar_as_text;
use crate::models::{Account, Profile};
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Signup request body.
///
/// Every field is optional at the serde level so that an absent `email` or
/// `password` is reported as a missing field rather than a parse failure.
/// Profile fields accept any JSON scalar and store its text form.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub phone: Option<String>,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Require a non-blank value.
fn required<'a>(value: Option<&'a String>, field: &'static str) -> Result<&'a str> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AuthError::MissingField(field).into())
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account.
///
/// Responds 201 with the stored record, password hash included.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>)> {
    let Json(req) = payload?;
    let email = required(req.email.as_ref(), "email")?;
    let password = required(req.password.as_ref(), "password")?;

    let profile = Profile {
        name: req.name,
        country: req.country,
        state: req.state,
        city: req.city,
        address: req.address,
        phone: req.phone,
    };

    let account = state
        .account_service()
        .register(email, password, profile)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Exchange an email and password for a bearer token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = payload?;
    let email = required(req.email.as_ref(), "email")?;
    let password = required(req.password.as_ref(), "password")?;

    let token = state
        .account_service()
        .authenticate(email, password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
