//! Repository for the `calendar_events` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CalendarEvent, CreateEvent, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dossier_id, created_by, title, description, starts_at, ends_at, \
                        status, created_at, updated_at";

/// Provides CRUD operations for calendar events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event (status defaults to PREVU), returning the row.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<CalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_events (dossier_id, created_by, title, description, starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(input.dossier_id)
            .bind(input.created_by)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(pool)
            .await
    }

    /// Find an event by id regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List non-deleted events for a dossier in chronological order.
    pub async fn list_for_dossier(
        pool: &PgPool,
        dossier_id: DbId,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE dossier_id = $1 AND status <> 'SUPPRIME'
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(dossier_id)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the event is absent or soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an event. Returns the updated row, or `None` when the
    /// event is absent or already SUPPRIME.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET status = 'SUPPRIME', updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
