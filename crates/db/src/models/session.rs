//! Session model and DTOs.

use sqlx::FromRow;
use paper_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub token_hash: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub is_active: bool,
}

/// An active session joined to its owning user.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithOwner {
    pub session_id: DbId,
    pub expires_at: Timestamp,
    pub user_id: DbId,
    pub username: String,
    pub user_is_active: bool,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
