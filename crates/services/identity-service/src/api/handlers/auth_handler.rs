//! Authentication handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::TokenResponse;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;

const USER_CREATED: &str = "User successfully created";

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    /// Plaintext password, hashed before storage
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "s3cret")]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "s3cret")]
    pub password: String,
}

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User successfully created")]
    pub message: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/:token", get(validate_token))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Malformed body or empty field"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state
        .identity
        .register(payload.username, payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: USER_CREATED.to_string(),
        }),
    ))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid credentials or malformed body"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .identity
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(TokenResponse::from(token)))
}

/// Check that a token exists and has not expired
#[utoipa::path(
    get,
    path = "/auth/token/{token}",
    tag = "Authentication",
    params(
        ("token" = String, Path, description = "Token key returned by login")
    ),
    responses(
        (status = 200, description = "Token is valid", body = TokenResponse),
        (status = 401, description = "Token expired"),
        (status = 404, description = "Token not found")
    )
)]
pub async fn validate_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.identity.validate_token(&token).await?;
    Ok(Json(TokenResponse::from(token)))
}
