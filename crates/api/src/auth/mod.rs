//! Authentication primitives and the session lifecycle.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`service`] -- registration, credential checks, session issue/validate/revoke.

pub mod password;
pub mod service;
