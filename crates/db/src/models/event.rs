//! Calendar event model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full event row from the `calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub dossier_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new event. New events always start as PREVU.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub dossier_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// DTO for updating an event. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub status: Option<String>,
}
