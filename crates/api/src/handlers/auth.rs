//! Handlers for the `/auth` resource (register, login, validate, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use paper_db::models::user::UserInfo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::service::{AuthService, LoginResponse};
use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, BearerToken};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body returned by `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account. Returns 201 with the new user's id and username,
/// or 409 if the username is taken.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    input.validate()?;
    let user = AuthService::register(&state.pool, &input.username, &input.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
///
/// Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;
    let response = AuthService::login(&state.pool, &input.username, &input.password).await?;
    Ok(Json(response))
}

/// GET /auth/validate
///
/// Return the identity behind the presented bearer token.
pub async fn validate(auth: AuthUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: auth.user_id,
        username: auth.username,
    })
}

/// POST /auth/logout
///
/// Close the presented session. Succeeds whether or not a token was sent.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> AppResult<Json<MessageResponse>> {
    AuthService::logout(&state.pool, token.as_deref()).await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}
