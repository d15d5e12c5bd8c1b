pub mod note;
pub mod session;
pub mod tag;
pub mod user;
