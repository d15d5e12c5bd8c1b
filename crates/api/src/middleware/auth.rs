//! Session-token extractors for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use paper_core::error::CoreError;
use paper_core::sessions::parse_bearer;
use paper_core::types::DbId;

use crate::auth::service::AuthService;
use crate::error::AppError;
use crate::state::AppState;

/// The bearer token from the `Authorization` header, when present and well formed.
///
/// Never rejects: a missing or malformed header yields `BearerToken(None)`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_string);
        Ok(BearerToken(token))
    }
}

/// Authenticated user resolved from a session token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = match BearerToken::from_request_parts(parts, state).await {
            Ok(token) => token,
            Err(never) => match never {},
        };

        let token = token.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing or malformed Authorization header. Expected: Bearer <token>".into(),
            ))
        })?;

        let user = AuthService::validate_session(&state.pool, &token)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}
