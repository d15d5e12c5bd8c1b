//! Session token rules: generation, at-rest hashing, lifetime and the
//! validity verdict applied when a token is presented.
//!
//! Tokens are opaque: 32 bytes from the thread-local CSPRNG, hex encoded.
//! Only the SHA-256 digest of a token is ever persisted.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lifetime of a session, fixed at creation.
pub const SESSION_LIFETIME_DAYS: i64 = 30;

/// Random bytes per token (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token string.
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

// ---------------------------------------------------------------------------
// Token generation and hashing
// ---------------------------------------------------------------------------

/// Generate a fresh session token.
///
/// The plaintext is handed to the client exactly once; store only
/// [`hash_session_token`] of it.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// SHA-256 hex digest of a presented token, used as the lookup key.
pub fn hash_session_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Expiry instant for a session created at `created_at`.
pub fn session_expiry(created_at: Timestamp) -> Timestamp {
    created_at + chrono::Duration::days(SESSION_LIFETIME_DAYS)
}

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

/// Outcome of checking an active session row against the clock and its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVerdict {
    /// The session authenticates its owner.
    Valid,
    /// `now` is past `expires_at`; the row must be flipped to inactive.
    Expired,
    /// The owning user is deactivated. The row itself is left untouched.
    OwnerInactive,
}

/// Decide whether an active session still authenticates its owner.
///
/// Expiry is checked first so that an expired session is always
/// invalidated on access, whatever the state of its owner. A session
/// whose `expires_at` equals `now` is still valid.
pub fn evaluate_session(expires_at: Timestamp, owner_active: bool, now: Timestamp) -> SessionVerdict {
    if now > expires_at {
        SessionVerdict::Expired
    } else if !owner_active {
        SessionVerdict::OwnerInactive
    } else {
        SessionVerdict::Valid
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for any other scheme or an empty token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn token_is_hex_of_expected_length() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_stable_and_differs_from_token() {
        let token = generate_session_token();
        let hash = hash_session_token(&token);
        assert_eq!(hash, hash_session_token(&token));
        assert_ne!(hash, token);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_session_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn expiry_is_thirty_days_after_creation() {
        let created = Utc::now();
        assert_eq!(session_expiry(created) - created, Duration::days(30));
    }

    #[test]
    fn fresh_session_with_active_owner_is_valid() {
        let now = Utc::now();
        assert_eq!(
            evaluate_session(session_expiry(now), true, now),
            SessionVerdict::Valid
        );
    }

    #[test]
    fn session_at_exact_expiry_is_still_valid() {
        let now = Utc::now();
        assert_eq!(evaluate_session(now, true, now), SessionVerdict::Valid);
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        let expires_at = now - Duration::seconds(1);
        assert_eq!(evaluate_session(expires_at, true, now), SessionVerdict::Expired);
    }

    #[test]
    fn expiry_wins_over_inactive_owner() {
        let now = Utc::now();
        let expires_at = now - Duration::days(1);
        assert_matches!(evaluate_session(expires_at, false, now), SessionVerdict::Expired);
    }

    #[test]
    fn inactive_owner_invalidates_unexpired_session() {
        let now = Utc::now();
        assert_matches!(
            evaluate_session(session_expiry(now), false, now),
            SessionVerdict::OwnerInactive
        );
    }

    #[test]
    fn parse_bearer_accepts_well_formed_header() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn parse_bearer_rejects_other_forms() {
        assert_eq!(parse_bearer("Basic abc123"), None);
        assert_eq!(parse_bearer("bearer abc123"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer    "), None);
        assert_eq!(parse_bearer(""), None);
    }
}
