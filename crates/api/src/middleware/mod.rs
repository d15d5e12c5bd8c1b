//! Request extractors for session authentication.
//!
//! - [`auth::BearerToken`] -- the raw bearer token, if the header carries one.
//! - [`auth::AuthUser`] -- the user behind a valid session; rejects with 401.

pub mod auth;
