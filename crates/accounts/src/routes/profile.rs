//! Profile handlers (bearer token required).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Account, ProfileUpdate};
use crate::state::AppState;

/// Return the authenticated account.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(account_id): RequireAuth,
) -> Result<Json<Account>> {
    let account = state.account_service().profile(account_id).await?;
    Ok(Json(account))
}

/// Merge profile fields into the authenticated account.
///
/// Keys outside the allow-list, `email` and `password` among them, are
/// dropped during deserialization.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(account_id): RequireAuth,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Account>> {
    let Json(update) = payload?;
    let account = state
        .account_service()
        .update_profile(account_id, &update)
        .await?;
    Ok(Json(account))
}
