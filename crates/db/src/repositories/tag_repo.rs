//! Repository for the `tags` table.
//!
//! Tags are keyed by a case-sensitive unique name. Note writes resolve tags
//! by name in bulk and never produce a duplicate row.

use sqlx::PgPool;
use paper_core::types::DbId;

use crate::models::tag::Tag;

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name";

/// Provides CRUD and find-or-create operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag.
    ///
    /// A duplicate name fails with a unique violation on `uq_tags_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by its exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all tags ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name COLLATE \"C\", id");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Rename a tag. A `None` name leaves the row unchanged.
    ///
    /// Returns `None` if no tag with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET name = COALESCE($2, name) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Cascade deletes its note associations; the notes
    /// themselves are untouched.
    ///
    /// Returns `true` if a tag was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the tag named `name`, creating it if it does not exist.
    pub async fn upsert_by_name(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let tag = Self::resolve_names_inner(&mut tx, &[name.to_string()])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(tag)
    }

    /// Find-or-create every tag in `names` within an existing transaction.
    ///
    /// Missing names are inserted with `ON CONFLICT DO NOTHING`, so rows that
    /// already exist are never locked. Names are inserted in sorted order;
    /// two writers creating the same new tags wait on each other in the same
    /// order. The follow-up read sees rows committed by a concurrent winner.
    pub(crate) async fn resolve_names_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        names: &[String],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut sorted = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        sqlx::query(
            "INSERT INTO tags (name) \
             SELECT name FROM unnest($1::text[]) WITH ORDINALITY AS t(name, ord) \
             ORDER BY ord \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&sorted)
        .execute(&mut **tx)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = ANY($1)");
        sqlx::query_as::<_, Tag>(&query)
            .bind(&sorted)
            .fetch_all(&mut **tx)
            .await
    }
}
