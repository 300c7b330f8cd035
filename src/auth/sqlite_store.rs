//! SQLite Credential Store
//! Mission: Durable account storage with database-enforced uniqueness

use crate::auth::models::{AccountFilter, NewAccount, UserAccount};
use crate::auth::store::{CredentialStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, access_token, created_at";

/// Account storage backed by a single SQLite connection
#[derive(Clone)]
pub struct SqliteCredentialStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    /// Open (or create) the account database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();

        let store = Self::with_connection(conn)?;
        info!("🔐 Credential store opened at {}", path.as_ref().display());
        Ok(store)
    }

    /// Private in-memory database (tests and throwaway runs)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                access_token TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_access_token ON users(access_token)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_one(&self, filter: &AccountFilter) -> Result<Option<UserAccount>, StoreError> {
        let conn = self.conn.lock().await;

        let account = match filter {
            AccountFilter::ByUsernameAndEmail { username, email } => conn
                .query_row(
                    &format!(
                        "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?1 AND email = ?2"
                    ),
                    params![username, email],
                    account_from_row,
                )
                .optional()?,
            AccountFilter::ByToken(token) => conn
                .query_row(
                    &format!(
                        "SELECT {ACCOUNT_COLUMNS} FROM users WHERE access_token = ?1 LIMIT 1"
                    ),
                    params![token],
                    account_from_row,
                )
                .optional()?,
        };

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<UserAccount, StoreError> {
        let account = UserAccount {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            access_token: account.access_token,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, access_token, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.id.to_string(),
                account.username,
                account.email,
                account.password_hash,
                account.access_token,
                account.created_at,
            ],
        )
        .map_err(insert_error)?;

        debug!("Inserted account {} ({})", account.username, account.id);
        Ok(account)
    }

    async fn list(&self, limit: usize) -> Result<Vec<UserAccount>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY rowid ASC LIMIT ?1"
        ))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let accounts = stmt
            .query_map(params![limit], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(UserAccount {
        id,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        access_token: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Map UNIQUE violations to `DuplicateKey`, naming the offending column.
fn insert_error(e: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(err, Some(message)) = &e {
        if err.code == ErrorCode::ConstraintViolation && message.contains("UNIQUE") {
            // "UNIQUE constraint failed: users.username"
            let field = message
                .rsplit("users.")
                .next()
                .unwrap_or("unknown")
                .to_string();
            return StoreError::DuplicateKey { field };
        }
    }
    StoreError::from(e)
}
