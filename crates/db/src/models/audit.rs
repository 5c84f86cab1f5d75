//! Audit log entry model and DTO.
//!
//! Entries are append-only: there is no update or delete path and no
//! `updated_at` column.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit entry. Snapshots must already be redacted
/// (see `lexcase_core::audit::redact_sensitive_fields`).
#[derive(Debug, Clone)]
pub struct CreateAuditEntry {
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
}
