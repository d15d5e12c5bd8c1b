//! Repository for the `sessions` table.
//!
//! Sessions are never deleted: invalidation flips `is_active` to false,
//! and the schema refuses to flip it back.

use sqlx::PgPool;
use paper_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, Session, SessionWithOwner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_hash, user_id, expires_at, created_at, is_active";

/// Provides persistence for login sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.token_hash)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by token hash regardless of its state.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE token_hash = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find an active session by token hash, joined to its owning user.
    ///
    /// Expiry is NOT checked here; the caller decides what an expired row means.
    pub async fn find_active_with_owner(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SessionWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, SessionWithOwner>(
            "SELECT s.id AS session_id, s.expires_at, u.id AS user_id, u.username,
                    u.is_active AS user_is_active
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = $1 AND s.is_active = true",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Deactivate a single session. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sessions SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate the session holding `token_hash`, if it is still active.
    pub async fn deactivate_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = false
             WHERE token_hash = $1 AND is_active = true",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate every active session whose `expires_at` is before `now`.
    /// Returns the count of sessions flipped.
    pub async fn deactivate_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = false
             WHERE is_active = true AND expires_at < $1",
        )
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count the active sessions held by a user.
    pub async fn count_active_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
