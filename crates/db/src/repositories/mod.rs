//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. "Absent" is reported as
//! `Ok(None)` or `Ok(false)`; only store failures are errors.

pub mod note_repo;
pub mod session_repo;
pub mod tag_repo;
pub mod user_repo;

pub use note_repo::NoteRepo;
pub use session_repo::SessionRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
