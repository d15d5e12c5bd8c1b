//! Handlers for the `/notes` resource.
//!
//! Tags travel inside note payloads as `[{"name": ...}]` and are resolved
//! by name on every write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use paper_core::error::CoreError;
use paper_core::notes::validate_note_title;
use paper_core::tags::validate_tag_name;
use paper_core::types::DbId;
use paper_db::models::note::{CreateNote, NoteFilter, NoteWithTags, UpdateNote};
use paper_db::models::tag::TagName;
use paper_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /notes?archived=<bool>&tag=<name>
///
/// List notes newest first. Both filters are optional and intersect.
pub async fn list_notes(
    State(state): State<AppState>,
    Query(filter): Query<NoteFilter>,
) -> AppResult<Json<Vec<NoteWithTags>>> {
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    Ok(Json(notes))
}

/// GET /notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoteWithTags>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    Ok(Json(note))
}

/// POST /notes
pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<NoteWithTags>)> {
    validate_note_title(&input.title).map_err(CoreError::Validation)?;
    validate_tags(&input.tags)?;

    let note = NoteRepo::create(&state.pool, &input).await?;

    tracing::info!(note_id = note.note.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /notes/{id}
///
/// Partial update. A `tags` array replaces the whole tag set; omitting it
/// leaves the tags alone.
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<Json<NoteWithTags>> {
    if let Some(title) = &input.title {
        validate_note_title(title).map_err(CoreError::Validation)?;
    }
    if let Some(tags) = &input.tags {
        validate_tags(tags)?;
    }

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    tracing::info!(note_id = id, "Note updated");
    Ok(Json(note))
}

/// DELETE /notes/{id}
///
/// Idempotent: deleting a missing note still returns 200.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NoteRepo::delete(&state.pool, id).await? {
        tracing::info!(note_id = id, "Note deleted");
    }
    Ok(StatusCode::OK)
}

fn validate_tags(tags: &[TagName]) -> Result<(), CoreError> {
    tags.iter()
        .try_for_each(|t| validate_tag_name(&t.name))
        .map_err(CoreError::Validation)
}
