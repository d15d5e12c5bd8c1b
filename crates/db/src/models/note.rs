//! Note model, the note-with-tags view, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paper_core::types::{DbId, Timestamp};

use super::tag::{Tag, TagName};

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A note enriched with its full tag set.
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithTags {
    #[serde(flatten)]
    pub note: Note,
    pub tags: Vec<Tag>,
}

impl NoteWithTags {
    /// Names of the attached tags, in their stored order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// DTO for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// Tags to attach, resolved by name (reused when they exist, created otherwise).
    #[serde(default)]
    pub tags: Vec<TagName>,
}

/// DTO for a partial note update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub archived: Option<bool>,
    /// If `Some`, replaces the note's entire tag set. If `None`, leaves it unchanged.
    pub tags: Option<Vec<TagName>>,
}

/// Query parameters for `GET /notes`. Both filters are optional and combine
/// as an intersection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFilter {
    pub archived: Option<bool>,
    pub tag: Option<String>,
}
