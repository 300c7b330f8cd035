//! Authentication Models
//! Mission: Define account records and the request/response shapes of the auth API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub access_token: String,
    pub created_at: String,
}

/// Fields supplied when creating an account; the store assigns id and created_at
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub access_token: String,
}

/// Exact-match lookup filters understood by every credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    ByUsernameAndEmail { username: String, email: String },
    ByToken(String),
}

impl AccountFilter {
    pub fn matches(&self, account: &UserAccount) -> bool {
        match self {
            AccountFilter::ByUsernameAndEmail { username, email } => {
                account.username == *username && account.email == *email
            }
            AccountFilter::ByToken(token) => account.access_token == *token,
        }
    }
}

/// Body of POST /register and POST /login.
///
/// Every field is optional on the wire so that a missing field is reported
/// through the regular error envelope instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Credentials after presence checks
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Uniform response wrapper: `{ "response": ..., "success": bool }`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
    pub success: bool,
}

impl<T> Envelope<T> {
    pub fn ok(response: T) -> Self {
        Self {
            response,
            success: true,
        }
    }

    pub fn failed(response: T) -> Self {
        Self {
            response,
            success: false,
        }
    }
}

/// Registration response (no password material)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
    pub access_token: String,
}

impl RegisterResponse {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            access_token: account.access_token.clone(),
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub access_token: String,
}

impl LoginResponse {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            access_token: account.access_token.clone(),
        }
    }
}

/// Protected resource payload
#[derive(Debug, Serialize, Deserialize)]
pub struct SecretResponse {
    pub message: String,
}

/// Account listing entry (sanitized: no hash, no token)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl UserSummary {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            created_at: account.created_at.clone(),
        }
    }
}
