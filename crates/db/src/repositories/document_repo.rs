//! Repository for the `documents` table (metadata only; bytes live in
//! object storage).

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dossier_id, uploaded_by, name, url, mime_type, size_bytes, \
                        version, status, created_at, updated_at";

/// Provides metadata operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record a newly uploaded document. The version is one past the highest
    /// existing version for the same (dossier, name), starting at 1.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (dossier_id, uploaded_by, name, url, mime_type, size_bytes, version)
             VALUES ($1, $2, $3, $4, $5, $6,
                     (SELECT COALESCE(MAX(version), 0) + 1 FROM documents
                       WHERE dossier_id = $1 AND name = $3))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.dossier_id)
            .bind(input.uploaded_by)
            .bind(&input.name)
            .bind(&input.url)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .fetch_one(pool)
            .await
    }

    /// Find a document by id regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ACTIF documents for a dossier, newest first.
    pub async fn list_for_dossier(
        pool: &PgPool,
        dossier_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE dossier_id = $1 AND status = 'ACTIF'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(dossier_id)
            .fetch_all(pool)
            .await
    }

    /// Flip a document's status (ACTIF/ARCHIVE/SUPPRIME).
    ///
    /// Returns `None` if the document is absent or already SUPPRIME.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
