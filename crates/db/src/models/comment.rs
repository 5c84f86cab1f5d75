//! Document comment model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full comment row from the `document_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub document_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub document_id: DbId,
    pub author_id: DbId,
    pub content: String,
}
