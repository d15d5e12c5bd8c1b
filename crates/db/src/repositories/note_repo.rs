//! Repository for the `notes` and `note_tags` tables.
//!
//! Every read returns notes with their complete tag set, loaded with one
//! batched join per call. Every write that touches tags runs in a single
//! transaction: note row, tag resolution by name, then association rows.

use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool};
use paper_core::tags::dedup_tag_names;
use paper_core::types::DbId;

use crate::models::note::{CreateNote, Note, NoteFilter, NoteWithTags, UpdateNote};
use crate::models::tag::{NoteTagRow, Tag, TagName};
use crate::repositories::TagRepo;

/// Column list for the `notes` table.
const COLUMNS: &str = "id, title, content, archived, created_at, updated_at";

/// Provides CRUD and filtered listing for notes and their tag associations.
pub struct NoteRepo;

impl NoteRepo {
    /// List notes matching `filter`, newest first.
    ///
    /// `archived` and `tag` are independent optional predicates; when both
    /// are present the result is their intersection. The `tag` predicate
    /// matches on membership, so each returned note still carries all of
    /// its tags. An empty `tag` is treated as absent.
    pub async fn list(pool: &PgPool, filter: &NoteFilter) -> Result<Vec<NoteWithTags>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes n \
             WHERE ($1::boolean IS NULL OR n.archived = $1) \
               AND ($2::text IS NULL OR EXISTS ( \
                    SELECT 1 FROM note_tags nt \
                    JOIN tags t ON t.id = nt.tag_id \
                    WHERE nt.note_id = n.id AND t.name = $2)) \
             ORDER BY n.created_at DESC, n.id DESC"
        );
        let notes = sqlx::query_as::<_, Note>(&query)
            .bind(filter.archived)
            .bind(filter.tag.as_deref().filter(|t| !t.is_empty()))
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = notes.iter().map(|n| n.id).collect();
        let mut tags_by_note = Self::load_tags(pool, &ids).await?;

        Ok(notes
            .into_iter()
            .map(|note| {
                let tags = tags_by_note.remove(&note.id).unwrap_or_default();
                NoteWithTags { note, tags }
            })
            .collect())
    }

    /// Find a note by ID, with its tags.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NoteWithTags>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        let Some(note) = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let tags = Self::load_tags(pool, &[note.id])
            .await?
            .remove(&note.id)
            .unwrap_or_default();
        Ok(Some(NoteWithTags { note, tags }))
    }

    /// Insert a new note and attach its tags, resolving each name to an
    /// existing tag or creating it.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<NoteWithTags, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO notes (title, content, archived) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&insert_query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.archived)
            .fetch_one(&mut *tx)
            .await?;

        let tags = Self::replace_tags_inner(&mut tx, note.id, &input.tags).await?;

        tx.commit().await?;
        tracing::debug!(note_id = note.id, tag_count = tags.len(), "Note created");
        Ok(NoteWithTags { note, tags })
    }

    /// Apply a partial update. Only non-`None` fields are changed; `tags`,
    /// when present, replaces the whole tag set.
    ///
    /// Returns `None` if no note with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<NoteWithTags>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE notes SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                archived = COALESCE($4, archived), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(note) = sqlx::query_as::<_, Note>(&update_query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.archived)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let tags = match &input.tags {
            Some(tags) => Self::replace_tags_inner(&mut tx, note.id, tags).await?,
            None => Self::load_tags(&mut *tx, &[note.id])
                .await?
                .remove(&note.id)
                .unwrap_or_default(),
        };

        tx.commit().await?;
        Ok(Some(NoteWithTags { note, tags }))
    }

    /// Delete a note. Its associations go with it; tags are untouched.
    ///
    /// Returns `true` if a note was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Load the tags of every note in `note_ids`, grouped by note.
    async fn load_tags<'e>(
        executor: impl PgExecutor<'e>,
        note_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Tag>>, sqlx::Error> {
        if note_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Byte-order collation, matching the in-memory sort in `replace_tags_inner`.
        let rows = sqlx::query_as::<_, NoteTagRow>(
            "SELECT nt.note_id, t.id, t.name \
             FROM note_tags nt \
             JOIN tags t ON t.id = nt.tag_id \
             WHERE nt.note_id = ANY($1) \
             ORDER BY t.name COLLATE \"C\", t.id",
        )
        .bind(note_ids)
        .fetch_all(executor)
        .await?;

        let mut grouped: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            grouped.entry(row.note_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
            });
        }
        Ok(grouped)
    }

    /// Replace a note's tag associations within an existing transaction.
    ///
    /// Duplicate names collapse to one association. Returns the resulting
    /// tag set ordered like [`Self::load_tags`].
    async fn replace_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        note_id: DbId,
        tags: &[TagName],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query("DELETE FROM note_tags WHERE note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await?;

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        let mut resolved = TagRepo::resolve_names_inner(tx, &dedup_tag_names(&names)).await?;

        if !resolved.is_empty() {
            let tag_ids: Vec<DbId> = resolved.iter().map(|t| t.id).collect();
            sqlx::query(
                "INSERT INTO note_tags (note_id, tag_id) \
                 SELECT $1, unnest($2::bigint[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(note_id)
            .bind(&tag_ids)
            .execute(&mut **tx)
            .await?;
        }

        resolved.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(resolved)
    }
}
