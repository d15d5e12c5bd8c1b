//! Integration tests for the user and session repositories.
//!
//! Exercises the credential and session tables against a real database:
//! - Username uniqueness
//! - Active flag toggling
//! - Session lookup joined to the owner
//! - One-way deactivation and the bulk expiry sweep
//! - Store-level guards on `expires_at` and `is_active`

use chrono::{Duration, Utc};
use paper_core::sessions::{generate_session_token, hash_session_token, session_expiry};
use paper_db::models::session::CreateSession;
use paper_db::models::user::{CreateUser, User};
use paper_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

fn new_session(user_id: i64, expires_in: Duration) -> (String, CreateSession) {
    let token = generate_session_token();
    let input = CreateSession {
        user_id,
        token_hash: hash_session_token(&token),
        expires_at: Utc::now() + expires_in,
    };
    (token, input)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_is_unique_violation(pool: PgPool) {
    new_user(&pool, "alice").await;

    let dup = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await;

    let err = dup.unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_username"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_usernames_are_case_sensitive(pool: PgPool) {
    new_user(&pool, "alice").await;
    new_user(&pool, "Alice").await;

    let found = UserRepo::find_by_username(&pool, "Alice").await.unwrap().unwrap();
    assert_eq!(found.username, "Alice");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_active_reports_changes_only(pool: PgPool) {
    let user = new_user(&pool, "bob").await;
    assert!(user.is_active);

    assert!(UserRepo::set_active(&pool, user.id, false).await.unwrap());
    assert!(!UserRepo::set_active(&pool, user.id, false).await.unwrap());

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);

    assert!(UserRepo::set_active(&pool, user.id, true).await.unwrap());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_find_active_with_owner(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    let (token, input) = new_session(user.id, Duration::days(30));
    SessionRepo::create(&pool, &input).await.unwrap();

    let found = SessionRepo::find_active_with_owner(&pool, &hash_session_token(&token))
        .await
        .unwrap()
        .expect("session should be found");
    assert_eq!(found.user_id, user.id);
    assert_eq!(found.username, "carol");
    assert!(found.user_is_active);

    let missing = SessionRepo::find_active_with_owner(&pool, &hash_session_token("nope"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_session_is_not_found_as_active(pool: PgPool) {
    let user = new_user(&pool, "dave").await;
    let (token, input) = new_session(user.id, Duration::days(30));
    let session = SessionRepo::create(&pool, &input).await.unwrap();
    assert!(session.is_active);

    assert!(SessionRepo::deactivate(&pool, session.id).await.unwrap());
    assert!(!SessionRepo::deactivate(&pool, session.id).await.unwrap());

    let hash = hash_session_token(&token);
    assert!(SessionRepo::find_active_with_owner(&pool, &hash)
        .await
        .unwrap()
        .is_none());

    // The row itself survives; invalidation is soft.
    let row = SessionRepo::find_by_token_hash(&pool, &hash).await.unwrap().unwrap();
    assert!(!row.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_cannot_be_reactivated(pool: PgPool) {
    let user = new_user(&pool, "erin").await;
    let (_token, input) = new_session(user.id, Duration::days(30));
    let session = SessionRepo::create(&pool, &input).await.unwrap();
    SessionRepo::deactivate(&pool, session.id).await.unwrap();

    let result = sqlx::query("UPDATE sessions SET is_active = true WHERE id = $1")
        .bind(session.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "reactivating a session must be rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expires_at_is_immutable(pool: PgPool) {
    let user = new_user(&pool, "frank").await;
    let (_token, input) = new_session(user.id, Duration::days(30));
    let session = SessionRepo::create(&pool, &input).await.unwrap();

    let result = sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1")
        .bind(session.id)
        .bind(session_expiry(Utc::now()))
        .execute(&pool)
        .await;
    assert!(result.is_err(), "changing expires_at must be rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_with_sessions_cannot_be_deleted(pool: PgPool) {
    let user = new_user(&pool, "fiona").await;
    let (token, input) = new_session(user.id, Duration::days(30));
    SessionRepo::create(&pool, &input).await.unwrap();

    let err = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));

    let hash = hash_session_token(&token);
    assert!(SessionRepo::find_by_token_hash(&pool, &hash)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivate_expired_only_touches_expired_active_rows(pool: PgPool) {
    let user = new_user(&pool, "grace").await;

    let (_, expired_a) = new_session(user.id, -Duration::hours(1));
    let (_, expired_b) = new_session(user.id, -Duration::days(2));
    let (_, live) = new_session(user.id, Duration::days(30));
    let expired_a = SessionRepo::create(&pool, &expired_a).await.unwrap();
    let expired_b = SessionRepo::create(&pool, &expired_b).await.unwrap();
    let live = SessionRepo::create(&pool, &live).await.unwrap();

    // Already inactive rows are not counted again.
    SessionRepo::deactivate(&pool, expired_b.id).await.unwrap();

    let flipped = SessionRepo::deactivate_expired(&pool, Utc::now()).await.unwrap();
    assert_eq!(flipped, 1);

    let a = SessionRepo::find_by_token_hash(&pool, &expired_a.token_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(!a.is_active);
    let l = SessionRepo::find_by_token_hash(&pool, &live.token_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(l.is_active);

    assert_eq!(SessionRepo::count_active_for_user(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivate_by_token_hash(pool: PgPool) {
    let user = new_user(&pool, "heidi").await;
    let (token, input) = new_session(user.id, Duration::days(30));
    SessionRepo::create(&pool, &input).await.unwrap();

    let hash = hash_session_token(&token);
    assert!(SessionRepo::deactivate_by_token_hash(&pool, &hash).await.unwrap());
    assert!(!SessionRepo::deactivate_by_token_hash(&pool, &hash).await.unwrap());
    assert!(!SessionRepo::deactivate_by_token_hash(&pool, "unknown").await.unwrap());
}
