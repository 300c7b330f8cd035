//! Authgate Backend Library
//!
//! Username/email/password registration, login and access-token gating.
//! The binary in `main.rs` only wires configuration, logging and the listener.

pub mod auth;
pub mod config;
pub mod middleware;

use axum::{middleware as axum_middleware, Router};
use tower_http::cors::CorsLayer;

use crate::auth::{api, AuthState};

/// Full application: auth routes plus request logging and permissive CORS.
pub fn build_app(state: AuthState) -> Router {
    api::router(state)
        .layer(axum_middleware::from_fn(middleware::request_logging))
        .layer(CorsLayer::permissive())
}
