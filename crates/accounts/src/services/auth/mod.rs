//! Account service.
//!
//! Registration, password login, and profile access. Each operation is a
//! single pass: no state survives between calls beyond what the store keeps.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use token::{TokenError, TokenIssuer};

use cpath_core::{AccountId, Email};

use crate::db::{AccountStore, RepositoryError};
use crate::models::{Account, NewAccount, Profile, ProfileUpdate};

/// Account service.
///
/// Borrows the store and token issuer from application state for the
/// duration of one request.
pub struct AccountService<'a> {
    accounts: &'a dyn AccountStore,
    tokens: &'a TokenIssuer,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(accounts: &'a dyn AccountStore, tokens: &'a TokenIssuer) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account.
    ///
    /// The email pre-check gives the common case a clean error; the store's
    /// unique constraint catches registrations that race past it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::AccountAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on internal failure.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AuthError::AccountAlreadyExists);
        }

        let password_hash = password::hash_password_blocking(password.to_owned()).await?;

        let account = self
            .accounts
            .insert(NewAccount {
                email,
                password_hash,
                profile,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    /// Check an email/password pair and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// malformed, or the password is wrong.
    /// Returns `AuthError::Token` if the token cannot be signed.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            password::verify_dummy_blocking(password.to_owned()).await?;
            return Err(AuthError::InvalidCredentials);
        };

        let valid =
            password::verify_password_blocking(password.to_owned(), account.password_hash).await?;
        if !valid {
            tracing::debug!(account_id = %account.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(account.id)?;
        tracing::info!(account_id = %account.id, "token issued");
        Ok(token)
    }

    /// Resolve a bearer token to an account ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token is invalid or expired.
    pub fn verify_token(&self, token: &str) -> Result<AccountId, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if the account doesn't exist.
    pub async fn profile(&self, account_id: AccountId) -> Result<Account, AuthError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Merge allow-listed profile fields into an account.
    ///
    /// An update carrying no fields is a read: nothing is written and
    /// `updated_at` is left alone.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if the account doesn't exist.
    pub async fn update_profile(
        &self,
        account_id: AccountId,
        update: &ProfileUpdate,
    ) -> Result<Account, AuthError> {
        if update.is_empty() {
            return self.profile(account_id).await;
        }

        let account = self
            .accounts
            .update_by_id(account_id, update)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        tracing::info!(account_id = %account.id, "profile updated");
        Ok(account)
    }
}
