//! `PostgreSQL` account repository.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so the crate
//! builds without a live database or an offline query cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cpath_core::{AccountId, Email};

use super::{AccountStore, RepositoryError};
use crate::models::{Account, NewAccount, Profile, ProfileUpdate};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, country, state, city, address, phone, \
     created_at, updated_at";

/// Raw `account` row.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    email: String,
    password_hash: String,
    name: Option<String>,
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            password_hash: row.password_hash,
            profile: Profile {
                name: row.name,
                country: row.country,
                state: row.state,
                city: row.city,
                address: row.address,
                phone: row.phone,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Account store backed by the `account` table.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let NewAccount {
            email,
            password_hash,
            profile,
        } = account;

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            INSERT INTO account (email, password_hash, name, country, state, city, address, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ACCOUNT_COLUMNS}
            "
        ))
        .bind(&email)
        .bind(&password_hash)
        .bind(profile.name)
        .bind(profile.country)
        .bind(profile.state)
        .bind(profile.city)
        .bind(profile.address)
        .bind(profile.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Account::try_from(row)
    }

    async fn update_by_id(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            UPDATE account
            SET name = COALESCE($2, name),
                country = COALESCE($3, country),
                state = COALESCE($4, state),
                city = COALESCE($5, city),
                address = COALESCE($6, address),
                phone = COALESCE($7, phone),
                updated_at = now()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.country.as_deref())
        .bind(update.state.as_deref())
        .bind(update.city.as_deref())
        .bind(update.address.as_deref())
        .bind(update.phone.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
