//! Handlers for the `/tags` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use paper_core::error::CoreError;
use paper_core::tags::validate_tag_name;
use paper_core::types::DbId;
use paper_db::models::tag::{Tag, TagName, UpdateTag};
use paper_db::repositories::TagRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::state::AppState;

/// GET /tags
///
/// All tags, ordered by name.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(tags))
}

/// GET /tags/{id}
pub async fn get_tag(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Tag>> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
    Ok(Json(tag))
}

/// POST /tags
///
/// Returns 409 if a tag with the same name exists.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<TagName>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    validate_tag_name(&input.name).map_err(CoreError::Validation)?;

    let tag = TagRepo::create(&state.pool, &input.name)
        .await
        .map_err(|e| map_duplicate_name(e, &input.name))?;

    tracing::info!(tag_id = tag.id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /tags/{id}
///
/// Rename a tag. Returns 404 for a missing id, 409 if the new name is taken.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<Json<Tag>> {
    if let Some(name) = &input.name {
        validate_tag_name(name).map_err(CoreError::Validation)?;
    }

    let tag = TagRepo::update(&state.pool, id, input.name.as_deref())
        .await
        .map_err(|e| map_duplicate_name(e, input.name.as_deref().unwrap_or_default()))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;

    tracing::info!(tag_id = id, "Tag updated");
    Ok(Json(tag))
}

/// DELETE /tags/{id}
///
/// Detaches the tag from every note; the notes stay. Idempotent.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TagRepo::delete(&state.pool, id).await? {
        tracing::info!(tag_id = id, "Tag deleted");
    }
    Ok(StatusCode::OK)
}

fn map_duplicate_name(err: sqlx::Error, name: &str) -> AppError {
    if is_unique_violation(&err, "uq_tags_name") {
        AppError::Core(CoreError::Conflict(format!("Tag '{name}' already exists")))
    } else {
        AppError::Database(err)
    }
}
