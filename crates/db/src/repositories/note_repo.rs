//! Repository for the `notes` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, dossier_id, client_id, author_id, content, status, created_at, updated_at";

/// Provides CRUD operations for internal notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (dossier_id, client_id, author_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(input.dossier_id)
            .bind(input.client_id)
            .bind(input.author_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a note by id regardless of status. Callers decide how to treat
    /// SUPPRIME rows (the services report them as not found).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ACTIF notes for a dossier, newest first.
    pub async fn list_for_dossier(
        pool: &PgPool,
        dossier_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE dossier_id = $1 AND status = 'ACTIF'
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(dossier_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count ACTIF notes for a dossier.
    pub async fn count_for_dossier(pool: &PgPool, dossier_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notes WHERE dossier_id = $1 AND status = 'ACTIF'")
                .bind(dossier_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Replace the note content.
    ///
    /// Returns `None` if the note is absent or soft-deleted.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET content = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a note. Returns the updated row, or `None` when the note
    /// is absent or already SUPPRIME.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET status = 'SUPPRIME', updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
