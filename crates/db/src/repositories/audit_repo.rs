//! Repository for the append-only `audit_log` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::{AuditEntry, CreateAuditEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, action, entity_type, entity_id, old_value, new_value, created_at";

/// Provides append and query operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Append a new audit entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAuditEntry) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log (user_id, action, entity_type, entity_id, old_value, new_value)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(input.user_id)
            .bind(&input.action)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.old_value)
            .bind(&input.new_value)
            .fetch_one(pool)
            .await
    }

    /// List entries for one target entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
