//! In-memory credential store, used as a test fake and for `--in-memory` runs.

use crate::auth::models::{AccountFilter, NewAccount, UserAccount};
use crate::auth::store::{CredentialStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<Vec<UserAccount>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.lock().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_one(&self, filter: &AccountFilter) -> Result<Option<UserAccount>, StoreError> {
        let accounts = self.accounts.lock();
        Ok(accounts.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<UserAccount, StoreError> {
        // Uniqueness check and push share one critical section
        let mut accounts = self.accounts.lock();

        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::DuplicateKey {
                field: "username".to_string(),
            });
        }
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateKey {
                field: "email".to_string(),
            });
        }

        let account = UserAccount {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            access_token: account.access_token,
            created_at: Utc::now().to_rfc3339(),
        };
        accounts.push(account.clone());

        Ok(account)
    }

    async fn list(&self, limit: usize) -> Result<Vec<UserAccount>, StoreError> {
        let accounts = self.accounts.lock();
        Ok(accounts.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            access_token: format!("token-{username}"),
        }
    }

    #[tokio::test]
    async fn test_uniqueness_enforced() {
        let store = MemoryCredentialStore::new();
        store.insert(new_account("ana", "a@x.com")).await.unwrap();

        let dup_username = store.insert(new_account("ana", "b@x.com")).await;
        assert!(matches!(dup_username, Err(StoreError::DuplicateKey { .. })));

        let dup_email = store.insert(new_account("bob", "a@x.com")).await;
        assert!(matches!(dup_email, Err(StoreError::DuplicateKey { .. })));

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registrations() {
        let store = Arc::new(MemoryCredentialStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(new_account("ana", &format!("a{i}@x.com")))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_limit() {
        let store = MemoryCredentialStore::new();
        assert!(store.is_empty());
        for i in 0..4 {
            store
                .insert(new_account(&format!("u{i}"), &format!("u{i}@x.com")))
                .await
                .unwrap();
        }

        assert_eq!(store.list(2).await.unwrap().len(), 2);
        assert_eq!(store.list(20).await.unwrap().len(), 4);
    }
}
