//! Wire types for the Paper REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in identity, as returned by register and validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A tag reference by name, as sent inside note payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagName {
    pub name: String,
}

impl From<&str> for TagName {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

/// Payload for `POST /notes`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewNote {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub archived: bool,
    pub tags: Vec<TagName>,
}

/// Payload for `PUT /notes/{id}`. `None` fields are omitted and left
/// unchanged by the server; `tags: Some(..)` replaces the tag set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagName>>,
}

/// Filters for `GET /notes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub archived: Option<bool>,
    pub tag: Option<String>,
}

impl NoteQuery {
    /// Query-string pairs for the filters that are set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(archived) = self.archived {
            pairs.push(("archived", archived.to_string()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.clone()));
        }
        pairs
    }
}
