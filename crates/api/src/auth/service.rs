//! Session-based authentication over the user and session repositories.
//!
//! Credential and token failures collapse to "no match" so callers cannot
//! tell an unknown username from a wrong password, or a forged token from
//! an expired one.

use chrono::Utc;
use paper_core::error::CoreError;
use paper_core::sessions::{
    evaluate_session, generate_session_token, hash_session_token, session_expiry, SessionVerdict,
};
use paper_core::types::DbId;
use paper_db::models::session::CreateSession;
use paper_db::models::user::{CreateUser, UserInfo};
use paper_db::repositories::{SessionRepo, UserRepo};
use paper_db::DbPool;
use serde::Serialize;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::error::{is_unique_violation, AppError, AppResult};

/// Message returned for every failed login.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Result of a successful login. `token` is the only time the plaintext
/// leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: DbId,
    pub username: String,
    pub token: String,
}

/// Registration, credential checks and the session lifecycle.
pub struct AuthService;

impl AuthService {
    /// Create a user with an Argon2id-hashed password.
    ///
    /// Fails with `Conflict` when the username is taken, including when a
    /// concurrent registration wins the race on the unique constraint.
    pub async fn register(pool: &DbPool, username: &str, password: &str) -> AppResult<UserInfo> {
        if UserRepo::find_by_username(pool, username).await?.is_some() {
            return Err(username_taken());
        }

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let input = CreateUser {
            username: username.to_string(),
            password_hash,
        };
        let user = UserRepo::create(pool, &input).await.map_err(|e| {
            if is_unique_violation(&e, "uq_users_username") {
                username_taken()
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(UserInfo::from(&user))
    }

    /// Check a username/password pair.
    ///
    /// Returns `Ok(None)` for an unknown user, a wrong password, or an
    /// inactive account. Each path performs exactly one hash verification.
    pub async fn validate_credentials(
        pool: &DbPool,
        username: &str,
        password: &str,
    ) -> AppResult<Option<UserInfo>> {
        let Some(user) = UserRepo::find_by_username(pool, username).await? else {
            verify_against_dummy(password);
            return Ok(None);
        };

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

        if !matches || !user.is_active {
            return Ok(None);
        }
        Ok(Some(UserInfo::from(&user)))
    }

    /// Validate credentials and open a new 30-day session.
    pub async fn login(pool: &DbPool, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = Self::validate_credentials(pool, username, password)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

        let token = generate_session_token();
        let input = CreateSession {
            user_id: user.id,
            token_hash: hash_session_token(&token),
            expires_at: session_expiry(Utc::now()),
        };
        let session = SessionRepo::create(pool, &input).await?;

        tracing::info!(user_id = user.id, session_id = session.id, "Session opened");
        Ok(LoginResponse {
            id: user.id,
            username: user.username,
            token,
        })
    }

    /// Resolve a presented token to its owner.
    ///
    /// An expired session is deactivated on the spot. A session whose owner
    /// is inactive is rejected but left as it is.
    pub async fn validate_session(pool: &DbPool, token: &str) -> AppResult<Option<UserInfo>> {
        let token_hash = hash_session_token(token);
        let Some(session) = SessionRepo::find_active_with_owner(pool, &token_hash).await? else {
            return Ok(None);
        };

        match evaluate_session(session.expires_at, session.user_is_active, Utc::now()) {
            SessionVerdict::Valid => Ok(Some(UserInfo {
                id: session.user_id,
                username: session.username,
            })),
            SessionVerdict::Expired => {
                SessionRepo::deactivate(pool, session.session_id).await?;
                tracing::debug!(session_id = session.session_id, "Expired session deactivated");
                Ok(None)
            }
            SessionVerdict::OwnerInactive => Ok(None),
        }
    }

    /// Deactivate the session behind `token`, if any. Unknown or missing
    /// tokens are a no-op.
    pub async fn logout(pool: &DbPool, token: Option<&str>) -> AppResult<()> {
        let Some(token) = token else {
            return Ok(());
        };

        if SessionRepo::deactivate_by_token_hash(pool, &hash_session_token(token)).await? {
            tracing::info!("Session closed");
        }
        Ok(())
    }

    /// Deactivate every active session whose expiry has passed.
    ///
    /// Returns the number of sessions flipped.
    pub async fn cleanup_expired_sessions(pool: &DbPool) -> AppResult<u64> {
        let count = SessionRepo::deactivate_expired(pool, Utc::now()).await?;
        Ok(count)
    }
}

fn username_taken() -> AppError {
    AppError::Core(CoreError::Conflict("Username already exists".into()))
}
