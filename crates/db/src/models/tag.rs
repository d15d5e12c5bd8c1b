//! Tag model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paper_core::types::DbId;

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
}

/// A tag attached to a note, as returned by the batched join over `note_tags`.
#[derive(Debug, Clone, FromRow)]
pub struct NoteTagRow {
    pub note_id: DbId,
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a tag, and for naming a tag inside a note payload
/// (`"tags": [{"name": "x"}]`).
#[derive(Debug, Clone, Deserialize)]
pub struct TagName {
    pub name: String,
}

/// DTO for renaming a tag. A missing `name` leaves the tag unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
}
