//! Authentication Module
//! Mission: Register accounts, check credentials, and gate routes behind opaque access tokens

pub mod api;
pub mod memory_store;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod sqlite_store;
pub mod store;
pub mod token;

pub use api::AuthState;
pub use memory_store::MemoryCredentialStore;
pub use middleware::{require_access_token, AuthenticatedAccount};
pub use service::{AuthError, AuthService};
pub use sqlite_store::SqliteCredentialStore;
pub use store::{CredentialStore, StoreError};
