//! Repository for the `dossiers` table, including the numbering transaction.

use lexcase_core::numbering::{self, DossierType};
use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::dossier::{CreateDossier, Dossier, DossierFilter, UpdateDossier};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, numero_unique, title, dossier_type, description, status, \
                        client_id, responsable_id, created_at, updated_at";

/// Provides lifecycle operations for dossiers.
pub struct DossierRepo;

impl DossierRepo {
    /// Insert a new dossier with a freshly generated `numero_unique`.
    ///
    /// The read-then-insert runs in one transaction holding a per-(type, year)
    /// advisory lock, so two concurrent creations for the same scope
    /// serialize instead of both reading the same "last" key. The
    /// `uq_dossiers_numero_unique` constraint remains the backstop: any
    /// residual duplicate fails the insert instead of corrupting the scheme.
    pub async fn create_numbered(
        pool: &PgPool,
        input: &CreateDossier,
        dossier_type: DossierType,
        year: i32,
    ) -> Result<Dossier, sqlx::Error> {
        let stem = numbering::numero_stem(dossier_type, year);

        let mut tx = pool.begin().await?;

        // Serialize concurrent numbering for this (type, year) scope. The
        // lock is released automatically at commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
            .bind(&stem)
            .execute(&mut *tx)
            .await?;

        // Highest existing key for this scope. Fixed-width zero padding makes
        // lexicographic order equal numeric order.
        let last: Option<(String,)> = sqlx::query_as(
            "SELECT numero_unique FROM dossiers
             WHERE dossier_type = $1 AND numero_unique LIKE $2 || '%'
             ORDER BY numero_unique DESC
             LIMIT 1",
        )
        .bind(dossier_type.as_str())
        .bind(&stem)
        .fetch_optional(&mut *tx)
        .await?;

        let sequence = numbering::next_sequence(last.as_ref().map(|(n,)| n.as_str()));
        let numero_unique = numbering::format_numero(dossier_type, year, sequence);

        let query = format!(
            "INSERT INTO dossiers
                (numero_unique, title, dossier_type, description, status, client_id, responsable_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let dossier = sqlx::query_as::<_, Dossier>(&query)
            .bind(&numero_unique)
            .bind(&input.title)
            .bind(&input.dossier_type)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.client_id)
            .bind(input.responsable_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(dossier)
    }

    /// Find a dossier by id, excluding soft-deleted rows.
    ///
    /// Every lifecycle operation goes through this filter, which is what
    /// makes SUPPRIME dossiers indistinguishable from absent ones.
    pub async fn find_live_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dossier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dossiers WHERE id = $1 AND status <> 'SUPPRIME'");
        sqlx::query_as::<_, Dossier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List dossiers with filters and pagination, most recent first.
    pub async fn list(
        pool: &PgPool,
        filter: &DossierFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dossier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dossiers
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR dossier_type = $2)
               AND ($3::bigint IS NULL OR client_id = $3)
               AND ($4::bigint IS NULL OR responsable_id = $4)
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Dossier>(&query)
            .bind(&filter.status)
            .bind(&filter.dossier_type)
            .bind(filter.client_id)
            .bind(filter.responsable_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count dossiers matching the same filters as [`DossierRepo::list`].
    pub async fn count(pool: &PgPool, filter: &DossierFilter) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM dossiers
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR dossier_type = $2)
               AND ($3::bigint IS NULL OR client_id = $3)
               AND ($4::bigint IS NULL OR responsable_id = $4)",
        )
        .bind(&filter.status)
        .bind(&filter.dossier_type)
        .bind(filter.client_id)
        .bind(filter.responsable_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Update a dossier. Only non-`None` fields in `input` are applied;
    /// `numero_unique` is never part of the updatable set. A `None` leaves
    /// the stored value untouched, so nullable columns (description,
    /// responsable_id) cannot be cleared back to NULL through this path.
    ///
    /// Returns `None` if the dossier is absent or soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDossier,
    ) -> Result<Option<Dossier>, sqlx::Error> {
        let query = format!(
            "UPDATE dossiers SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                client_id = COALESCE($4, client_id),
                responsable_id = COALESCE($5, responsable_id),
                updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dossier>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(input.responsable_id)
            .fetch_optional(pool)
            .await
    }

    /// Write a new status unconditionally (transitions are permissive).
    ///
    /// Returns `None` if the dossier is absent or already SUPPRIME.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Dossier>, sqlx::Error> {
        let query = format!(
            "UPDATE dossiers SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dossier>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the responsible staff member.
    ///
    /// Returns `None` if the dossier is absent or soft-deleted.
    pub async fn set_responsable(
        pool: &PgPool,
        id: DbId,
        responsable_id: DbId,
    ) -> Result<Option<Dossier>, sqlx::Error> {
        let query = format!(
            "UPDATE dossiers SET responsable_id = $2, updated_at = NOW()
             WHERE id = $1 AND status <> 'SUPPRIME'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dossier>(&query)
            .bind(id)
            .bind(responsable_id)
            .fetch_optional(pool)
            .await
    }
}
