//! Repository for the `tasks` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dossier_id, created_by, assignee_id, title, description, \
                        due_at, status, created_at, updated_at";

/// Provides CRUD operations for dossier tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row. New tasks default to
    /// A_FAIRE.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (dossier_id, created_by, assignee_id, title, description, due_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.dossier_id)
            .bind(input.created_by)
            .bind(input.assignee_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_at)
            .fetch_one(pool)
            .await
    }

    /// Find a task by id regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List non-SUPPRIME tasks for a dossier, newest first.
    pub async fn list_for_dossier(
        pool: &PgPool,
        dossier_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE dossier_id = $1 AND status <> 'SUPPRIME'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(dossier_id)
            .fetch_all(pool)
            .await
    }

    /// Write a new task status. SUPPRIME acts as the soft delete.
    ///
    /// Returns `None` if the task is absent or already SUPPRIME.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
