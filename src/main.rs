//! Authgate - username/email/password authentication service
//! Mission: Register users, issue access tokens, guard protected resources

use anyhow::{Context, Result};
use authgate_backend::{
    auth::{AuthService, AuthState, CredentialStore, MemoryCredentialStore, SqliteCredentialStore},
    build_app,
    config::{load_env, Args},
};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let args = Args::parse();

    info!("🚀 Authgate starting");

    let store: Arc<dyn CredentialStore> = if args.in_memory {
        warn!("⚠️  Using in-memory credential store - accounts are lost on restart");
        Arc::new(MemoryCredentialStore::new())
    } else {
        let db_path = args.resolved_db_path();
        Arc::new(
            SqliteCredentialStore::open(&db_path)
                .with_context(|| format!("Failed to open credential store at {}", db_path.display()))?,
        )
    };

    let service = AuthService::new(store, args.bcrypt_cost);
    let app = build_app(AuthState::new(service));

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate_backend=debug,authgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
