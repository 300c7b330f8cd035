//! Authentication API Endpoints
//! Mission: Provide registration, login, the protected secret and the account listing

use crate::auth::{
    middleware::{require_access_token, AuthenticatedAccount},
    models::{
        CredentialsRequest, Envelope, LoginResponse, RegisterResponse, SecretResponse,
        UserSummary,
    },
    service::{AuthError, AuthService},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use tracing::warn;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub service: AuthService,
}

impl AuthState {
    pub fn new(service: AuthService) -> Self {
        Self { service }
    }
}

/// All auth routes; `/secrets` sits behind `require_access_token`.
pub fn router(state: AuthState) -> Router {
    let protected = Router::new()
        .route("/secrets", get(secrets))
        .route_layer(middleware::from_fn_with_state(
            state.service.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users", get(list_users))
        .merge(protected)
        .with_state(state)
}

async fn root() -> &'static str {
    "Authentication backend: POST /register, POST /login, GET /secrets, GET /users"
}

async fn health_check() -> &'static str {
    "OK"
}

/// Register endpoint - POST /register
pub async fn register(
    State(state): State<AuthState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<RegisterResponse>>), ApiError> {
    let Json(request) = payload.map_err(rejection_to_validation)?;
    let credentials = AuthService::validate(request)?;

    let account = state.service.register(credentials).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(RegisterResponse::from_account(&account))),
    ))
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let Json(request) = payload.map_err(rejection_to_validation)?;
    let credentials = AuthService::validate(request)?;

    let account = state.service.login(credentials).await?;

    Ok(Json(Envelope::ok(LoginResponse::from_account(&account))))
}

/// Protected secret - GET /secrets
pub async fn secrets(
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Json<Envelope<SecretResponse>> {
    Json(Envelope::ok(SecretResponse {
        message: format!(
            "Unfortunately, this is a top secret! You cannot continue browsing here, {}.",
            account.username
        ),
    }))
}

/// Account listing - GET /users (capped at 20)
pub async fn list_users(
    State(state): State<AuthState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let accounts = state.service.list_accounts().await.map_err(|e| {
        warn!("Failed to list users: {}", e);
        ApiError::UserListing
    })?;

    Ok(Json(accounts.iter().map(UserSummary::from_account).collect()))
}

fn rejection_to_validation(rejection: JsonRejection) -> AuthError {
    AuthError::Validation(rejection.body_text())
}

/// Auth API errors
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    UserListing,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let auth_error = match self {
            ApiError::UserListing => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "Could not list users" })),
                )
                    .into_response();
            }
            ApiError::Auth(e) => e,
        };

        let (status, message) = match auth_error {
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Registration(_) => {
                (StatusCode::BAD_REQUEST, "Could not create user".to_string())
            }
            AuthError::Authentication => (
                StatusCode::NOT_FOUND,
                "Username, email or password doesn't match.".to_string(),
            ),
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Please log in".to_string()),
            AuthError::Store(e) => {
                warn!("Store failure surfaced to client: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Request could not be completed".to_string(),
                )
            }
        };

        (status, Json(Envelope::failed(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{memory_store::MemoryCredentialStore, password::MIN_COST};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let service = AuthService::new(Arc::new(MemoryCredentialStore::new()), MIN_COST);
        router(AuthState::new(service))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_statuses() {
        let validation = ApiError::from(AuthError::Validation("x".to_string())).into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let mismatch = ApiError::from(AuthError::Authentication).into_response();
        assert_eq!(mismatch.status(), StatusCode::NOT_FOUND);

        let unauthenticated = ApiError::from(AuthError::Unauthenticated).into_response();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

        let listing = ApiError::UserListing.into_response();
        assert_eq!(listing.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_created() {
        let response = test_router()
            .oneshot(json_request(
                "/register",
                json!({"username": "ana", "email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["response"]["username"], "ana");
        assert_eq!(body["response"]["accessToken"].as_str().unwrap().len(), 256);
        assert!(body["response"].get("password").is_none());
        assert!(body["response"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_register_missing_password() {
        let response = test_router()
            .oneshot(json_request(
                "/register",
                json!({"username": "ana", "email": "a@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected_with_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_login_unknown_user_not_found() {
        let response = test_router()
            .oneshot(json_request(
                "/login",
                json!({"username": "ghost", "email": "g@x.com", "password": "pw"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["response"],
            "Username, email or password doesn't match."
        );
    }

    #[tokio::test]
    async fn test_secrets_without_header() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/secrets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["response"], "Please log in");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_users_empty_list() {
        let response = test_router()
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = test_router();

        let root = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(root.status(), StatusCode::OK);

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }
}
