//! Authentication Middleware
//! Mission: Gate protected routes behind access-token lookup

use crate::auth::{
    api::ApiError,
    models::UserAccount,
    service::{AuthError, AuthService},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Account resolved by `require_access_token`, available to protected handlers
/// through `Extension<AuthenticatedAccount>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub UserAccount);

/// Auth middleware that resolves the `Authorization` header to an account
pub async fn require_access_token(
    State(service): State<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or(AuthError::Unauthenticated)?;

    let account = service.authenticate_token(&token).await?;

    req.extensions_mut().insert(AuthenticatedAccount(account));

    Ok(next.run(req).await)
}

/// Raw token from the `Authorization` header. A `Bearer ` scheme prefix is
/// accepted and stripped.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
