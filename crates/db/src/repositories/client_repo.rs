//! Repository for the `clients` table.

use lexcase_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientFilter, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, company_name, email, phone, address, \
                        status, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (first_name, last_name, company_name, email, phone, address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.company_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by id only if the record is ACTIF. Used as the
    /// existence gate for dossier creation.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND status = 'ACTIF'");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients with filters and pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &ClientFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL
                    OR first_name ILIKE '%' || $2 || '%'
                    OR last_name ILIKE '%' || $2 || '%'
                    OR company_name ILIKE '%' || $2 || '%')
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&filter.status)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count clients matching the same filters as [`ClientRepo::list`].
    pub async fn count(pool: &PgPool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM clients
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL
                    OR first_name ILIKE '%' || $2 || '%'
                    OR last_name ILIKE '%' || $2 || '%'
                    OR company_name ILIKE '%' || $2 || '%')",
        )
        .bind(&filter.status)
        .bind(&filter.search)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Update a client. Only non-`None` fields in `input` are applied; a
    /// `None` leaves the stored value untouched, so nullable columns
    /// (company_name, phone, address) cannot be cleared back to NULL
    /// through this path.
    ///
    /// Returns `None` if no ACTIF row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                company_name = COALESCE($4, company_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.company_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a client by flipping status to INACTIF.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET status = 'INACTIF', updated_at = NOW()
             WHERE id = $1 AND status = 'ACTIF'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
