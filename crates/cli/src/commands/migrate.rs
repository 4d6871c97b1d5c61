//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! cpath-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`, then to the local development database
//!
//! # Migration Files
//!
//! Migrations live in `crates/accounts/migrations/` and are embedded into
//! the binary at compile time.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the accounts database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = cpath_accounts::config::database_url_from_env();

    tracing::info!("Connecting to accounts database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running accounts migrations...");
    sqlx::migrate!("../accounts/migrations").run(&pool).await?;

    tracing::info!("Accounts migrations complete!");
    Ok(())
}
