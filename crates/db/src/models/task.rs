//! Dossier task model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub dossier_id: DbId,
    pub created_by: DbId,
    pub assignee_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new task. New tasks start as A_FAIRE.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub dossier_id: DbId,
    pub created_by: DbId,
    pub assignee_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<Timestamp>,
}
