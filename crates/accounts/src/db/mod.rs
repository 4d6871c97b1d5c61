//! Persistence for account records.
//!
//! # Database: `cpathlabs`
//!
//! ## Tables
//!
//! - `account` - One row per registered account, unique on `email`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/accounts/migrations/` and run via:
//! ```bash
//! cargo run -p cpath-cli -- migrate
//! ```
//!
//! # Stores
//!
//! Handlers talk to an [`AccountStore`]. [`PgAccountStore`] is the production
//! implementation; [`MemoryAccountStore`] keeps records in process and backs
//! the HTTP tests.

pub mod accounts;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cpath_core::{AccountId, Email};

use crate::models::{Account, NewAccount, ProfileUpdate};

pub use accounts::PgAccountStore;
pub use memory::MemoryAccountStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The persistence boundary for account records.
///
/// Every method is a single round trip; implementations hold no
/// per-request state.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its normalized email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    /// Look up an account by ID.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Insert a new account.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError>;

    /// Merge allow-listed profile fields into an account.
    ///
    /// Returns `None` if the ID does not resolve.
    async fn update_by_id(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
