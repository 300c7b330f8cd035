//! Service configuration from CLI flags, environment variables and `.env` files.

use clap::Parser;
use dotenv::dotenv;
use std::path::{Path, PathBuf};

use crate::auth::password::{MAX_COST, MIN_COST};

#[derive(Debug, Clone, Parser)]
#[command(name = "authgate", about = "Username/email/password authentication service")]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database holding user accounts
    #[arg(long, env = "AUTH_DB_PATH", default_value = "authgate.db")]
    pub db_path: String,

    /// Keep accounts in process memory instead of SQLite
    #[arg(long, env = "AUTH_IN_MEMORY", default_value_t = false)]
    pub in_memory: bool,

    /// bcrypt work factor
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(MIN_COST as i64..=MAX_COST as i64)
    )]
    pub bcrypt_cost: u32,
}

impl Args {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database path with relative values anchored at the crate directory,
    /// not the caller's cwd.
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_data_path(&self.db_path, Path::new(env!("CARGO_MANIFEST_DIR")))
    }
}

pub fn resolve_data_path(raw: &str, base: &Path) -> PathBuf {
    let p = PathBuf::from(raw.trim());
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

/// Load `.env` from the cwd search path, then from the crate directory.
pub fn load_env() {
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override() {
        let args = Args::try_parse_from([
            "authgate",
            "--port",
            "9090",
            "--host",
            "127.0.0.1",
            "--in-memory",
            "--bcrypt-cost",
            "4",
        ])
        .unwrap();

        assert_eq!(args.bind_addr(), "127.0.0.1:9090");
        assert!(args.in_memory);
        assert_eq!(args.bcrypt_cost, 4);
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        assert!(Args::try_parse_from(["authgate", "--bcrypt-cost", "2"]).is_err());
        assert!(Args::try_parse_from(["authgate", "--bcrypt-cost", "40"]).is_err());
    }

    #[test]
    fn test_resolve_data_path() {
        let base = Path::new("/srv/authgate");
        assert_eq!(
            resolve_data_path("users.db", base),
            PathBuf::from("/srv/authgate/users.db")
        );
        assert_eq!(
            resolve_data_path("/var/lib/users.db", base),
            PathBuf::from("/var/lib/users.db")
        );
    }
}
