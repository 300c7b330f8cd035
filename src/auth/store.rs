//! Credential Store
//! Mission: Abstract the persistence collaborator behind exact-match lookup and insert

use crate::auth::models::{AccountFilter, NewAccount, UserAccount};
use async_trait::async_trait;

/// Persistence contract for user accounts.
///
/// Implementations must make the uniqueness check and the insert atomic:
/// two concurrent inserts with the same username (or email) cannot both succeed.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// First account matching the filter, if any
    async fn find_one(&self, filter: &AccountFilter) -> Result<Option<UserAccount>, StoreError>;

    /// Persist a new account, assigning its id and creation time
    async fn insert(&self, account: NewAccount) -> Result<UserAccount, StoreError>;

    /// Up to `limit` accounts in creation order
    async fn list(&self, limit: usize) -> Result<Vec<UserAccount>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    /// A unique field (`username` or `email`) already exists
    DuplicateKey { field: String },
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { field } => write!(f, "Duplicate value for unique field: {}", field),
            Self::Backend(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Backend(e.to_string())
    }
}
