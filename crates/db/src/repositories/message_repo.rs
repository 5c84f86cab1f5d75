//! Repository for the `chat_messages` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{ChatMessage, CreateMessage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dossier_id, sender_id, content, status, created_at";

/// Provides operations for per-dossier chat messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a new message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (dossier_id, sender_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.dossier_id)
            .bind(input.sender_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// List non-deleted messages for a dossier, oldest first (chat order).
    pub async fn list_for_dossier(
        pool: &PgPool,
        dossier_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_messages
             WHERE dossier_id = $1 AND status <> 'SUPPRIME'
             ORDER BY created_at ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(dossier_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count non-deleted messages for a dossier.
    pub async fn count_for_dossier(pool: &PgPool, dossier_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_messages WHERE dossier_id = $1 AND status <> 'SUPPRIME'",
        )
        .bind(dossier_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Soft-delete a message, scoped to its dossier so a message cannot be
    /// deleted through another dossier's path. Returns `true` if the row
    /// was updated.
    pub async fn soft_delete(
        pool: &PgPool,
        dossier_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_messages SET status = 'SUPPRIME'
             WHERE id = $1 AND dossier_id = $2 AND status = 'ACTIF'",
        )
        .bind(id)
        .bind(dossier_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
