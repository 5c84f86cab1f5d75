//! Repository for the `document_comments` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document_id, author_id, content, status, created_at, updated_at";

/// Provides CRUD operations for document comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_comments (document_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.document_id)
            .bind(input.author_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by id regardless of status. Callers decide how to
    /// treat SUPPRIME rows (the services report them as not found).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ACTIF comments for a document, newest first.
    pub async fn list_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_comments
             WHERE document_id = $1 AND status = 'ACTIF'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the comment content.
    ///
    /// Returns `None` if the comment is absent or soft-deleted.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE document_comments SET content = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment. Returns the updated row, or `None` when the
    /// comment is absent or already SUPPRIME.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE document_comments SET status = 'SUPPRIME', updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
