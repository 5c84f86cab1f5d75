//! Document metadata model and DTOs.
//!
//! Only metadata lives here; the bytes themselves are held by the object
//! storage provider and referenced through `url`.

use lexcase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full document row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub dossier_id: DbId,
    pub uploaded_by: DbId,
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub version: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a newly uploaded document.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub dossier_id: DbId,
    pub uploaded_by: DbId,
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}
