//! Auth Gateway
//! Mission: Register accounts, check credentials and resolve bearer tokens
//!
//! Stateless apart from the injected credential store. Every operation is a
//! single hash computation or comparison plus a single store call.

use crate::auth::models::{AccountFilter, Credentials, CredentialsRequest, NewAccount, UserAccount};
use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::auth::store::{CredentialStore, StoreError};
use crate::auth::token::generate_access_token;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Accounts returned by the public listing endpoint
pub const LIST_LIMIT: usize = 20;

#[derive(Debug)]
pub enum AuthError {
    /// A required field is missing or the body could not be read
    Validation(String),
    /// Duplicate username/email or a persistence failure while registering
    Registration(String),
    /// No account with this username+email, or the password did not match
    Authentication,
    /// Missing or unknown access token
    Unauthenticated,
    Store(StoreError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation failed: {}", msg),
            Self::Registration(msg) => write!(f, "Registration failed: {}", msg),
            Self::Authentication => write!(f, "Credentials do not match"),
            Self::Unauthenticated => write!(f, "Missing or invalid access token"),
            Self::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// The gateway between HTTP handlers and the credential store
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Presence checks only. `email` may be absent or empty.
    pub fn validate(request: CredentialsRequest) -> Result<Credentials, AuthError> {
        let username = request
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AuthError::Validation("username is required".to_string()))?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AuthError::Validation("password is required".to_string()))?;

        Ok(Credentials {
            username,
            email: request.email.unwrap_or_default(),
            password,
        })
    }

    /// Create an account with a fresh salted hash and access token.
    pub async fn register(&self, credentials: Credentials) -> Result<UserAccount, AuthError> {
        let Credentials {
            username,
            email,
            password,
        } = credentials;

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Registration(format!("hashing task failed: {e}")))?
            .map_err(|e: PasswordError| AuthError::Registration(e.to_string()))?;

        let new_account = NewAccount {
            username: username.clone(),
            email,
            password_hash,
            access_token: generate_access_token(),
        };

        let account = self.store.insert(new_account).await.map_err(|e| {
            warn!("❌ Registration rejected for {}: {}", username, e);
            AuthError::Registration(e.to_string())
        })?;

        info!("✅ Registered user: {} ({})", account.username, account.id);
        Ok(account)
    }

    /// Look up by username AND email, then compare the password with the stored hash.
    pub async fn login(&self, credentials: Credentials) -> Result<UserAccount, AuthError> {
        info!("🔐 Login attempt: {}", credentials.username);

        let account = self
            .store
            .find_one(&AccountFilter::ByUsernameAndEmail {
                username: credentials.username.clone(),
                email: credentials.email.clone(),
            })
            .await?;

        let Some(account) = account else {
            warn!("❌ Failed login attempt: {}", credentials.username);
            return Err(AuthError::Authentication);
        };

        let password = credentials.password;
        let stored_hash = account.password_hash.clone();
        let verdict =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await;
        let valid = password_verdict(verdict, &account.username);

        if !valid {
            warn!("❌ Failed login attempt: {}", account.username);
            return Err(AuthError::Authentication);
        }

        info!("✅ Login successful: {}", account.username);
        Ok(account)
    }

    /// Resolve a bearer token to its account. No side effects.
    pub async fn authenticate_token(&self, token: &str) -> Result<UserAccount, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        match self
            .store
            .find_one(&AccountFilter::ByToken(token.to_string()))
            .await?
        {
            Some(account) => {
                debug!("Access token accepted for {}", account.username);
                Ok(account)
            }
            None => Err(AuthError::Unauthenticated),
        }
    }

    /// First `LIST_LIMIT` accounts in creation order.
    pub async fn list_accounts(&self) -> Result<Vec<UserAccount>, AuthError> {
        Ok(self.store.list(LIST_LIMIT).await?)
    }
}

/// A verification task that never reported back counts as a mismatch.
fn password_verdict(verdict: Result<bool, JoinError>, username: &str) -> bool {
    match verdict {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Password verification task failed for {}: {}", username, e);
            false
        }
    }
}
