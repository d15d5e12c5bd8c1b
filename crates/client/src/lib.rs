//! Typed HTTP client for the Paper notes API.
//!
//! [`PaperClient`] wraps the REST surface and owns a [`ClientSession`]: the
//! current token and an observable current user. Tokens persist through a
//! [`TokenStore`] so a restarted client can pick its session back up.

pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use client::PaperClient;
pub use error::ClientError;
pub use session::ClientSession;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
