//! Chat message model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full message row from the `chat_messages` table. Immutable apart from the
/// soft-delete status, hence no `updated_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub dossier_id: DbId,
    pub sender_id: DbId,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for posting a new message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub dossier_id: DbId,
    pub sender_id: DbId,
    pub content: String,
}
