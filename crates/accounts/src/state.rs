//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AccountsConfig;
use crate::db::AccountStore;
use crate::services::auth::{AccountService, TokenIssuer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the account store and token issuer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    accounts: Arc<dyn AccountStore>,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Accounts configuration (provides the token signing secret)
    /// * `accounts` - Account store
    #[must_use]
    pub fn new(config: &AccountsConfig, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                accounts,
                tokens: TokenIssuer::new(&config.jwt_secret),
            }),
        }
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountStore {
        self.inner.accounts.as_ref()
    }

    /// Get a reference to the token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Build an account service borrowing this state.
    #[must_use]
    pub fn account_service(&self) -> AccountService<'_> {
        AccountService::new(self.accounts(), self.tokens())
    }
}
