//! Domain rules for the Digital Paper note service.
//!
//! Everything here is pure: no database, no HTTP. The `db` and `api`
//! crates build on these types and validators.

pub mod error;
pub mod notes;
pub mod sessions;
pub mod tags;
pub mod types;
