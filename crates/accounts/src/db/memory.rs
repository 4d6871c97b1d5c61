//! In-process account store.
//!
//! Behaves like the `account` table (unique email, sequential IDs, profile
//! merge) without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use cpath_core::{AccountId, Email};

use super::{AccountStore, RepositoryError};
use crate::models::{Account, NewAccount, ProfileUpdate};

#[derive(Default)]
struct Inner {
    next_id: i32,
    accounts: HashMap<AccountId, Account>,
}

/// Account store held entirely in memory.
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// Returns `true` if no account has been stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        inner.next_id += 1;
        let id = AccountId::new(inner.next_id);
        let now = Utc::now();
        let stored = Account {
            id,
            email: account.email,
            password_hash: account.password_hash,
            profile: account.profile,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(id, stored.clone());

        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, RepositoryError> {
        let mut inner = self.inner.write().await;

        let Some(account) = inner.accounts.get_mut(&id) else {
            return Ok(None);
        };
        account.profile.apply(update);
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Profile;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
            profile: Profile::default(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryAccountStore::new();
        let first = store.insert(new_account("a@b.com")).await.unwrap();
        let second = store.insert(new_account("c@d.com")).await.unwrap();

        assert_eq!(first.id, AccountId::new(1));
        assert_eq!(second.id, AccountId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = MemoryAccountStore::new();
        store.insert(new_account("a@b.com")).await.unwrap();

        let err = store.insert(new_account("A@B.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_email_and_id() {
        let store = MemoryAccountStore::new();
        let created = store.insert(new_account("a@b.com")).await.unwrap();

        let by_email = store
            .find_by_email(&Email::parse("a@b.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(store.find_by_id(AccountId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() {
        let store = MemoryAccountStore::new();
        let result = store
            .update_by_id(AccountId::new(1), &ProfileUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
