//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Password from the environment keeps it out of shell history
//! CPATH_ACCOUNT_PASSWORD=... cpath-cli account create -e ada@example.com -n "Ada"
//! ```
//!
//! # Environment Variables
//!
//! Loads the same configuration as the server (`JWT_SECRET` included), so
//! accounts created here go through the same hashing and uniqueness checks.

use std::sync::Arc;

use thiserror::Error;

use cpath_accounts::config::{AccountsConfig, ConfigError};
use cpath_accounts::db::{self, PgAccountStore};
use cpath_accounts::models::Profile;
use cpath_accounts::services::auth::AuthError;
use cpath_accounts::state::AppState;
use cpath_core::AccountId;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration was rejected.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AccountError::Auth` if the email is invalid or already taken.
pub async fn create(
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<AccountId, AccountError> {
    let config = AccountsConfig::from_env()?;

    tracing::info!("Connecting to accounts database...");
    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(&config, Arc::new(PgAccountStore::new(pool)));

    let profile = Profile {
        name,
        ..Profile::default()
    };
    let account = state
        .account_service()
        .register(email, password, profile)
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );

    Ok(account.id)
}
