//! Internal note model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full note row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub dossier_id: DbId,
    pub client_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new note. The client id is copied from the parent
/// dossier so notes stay queryable per client.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub dossier_id: DbId,
    pub client_id: DbId,
    pub author_id: DbId,
    pub content: String,
}
