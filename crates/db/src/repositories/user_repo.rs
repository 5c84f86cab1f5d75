//! Repository for the `users` table.

use lexcase_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, status, \
                        refresh_token_hash, reset_token_hash, reset_token_expires_at, \
                        created_at, updated_at";

/// Provides CRUD and token-lifecycle operations for staff accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive, emails are stored lowercased).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id only if the account is ACTIF.
    pub async fn find_active_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND status = 'ACTIF'");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List users, optionally filtered by role and/or status.
    pub async fn list(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::text IS NULL OR role = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&filter.role)
            .bind(&filter.status)
            .fetch_all(pool)
            .await
    }

    /// Store the refresh-token digest for a user (login rotation point).
    pub async fn set_refresh_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the refresh-token digest (logout). Idempotent.
    pub async fn clear_refresh_token(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token_hash = NULL, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Store a reset-token digest with its explicit expiry. A newer request
    /// overwrites the previous one, which is what makes old links dead.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = $2, reset_token_expires_at = $3,
                    updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear both reset fields in one UPDATE
    /// (single-use enforcement).
    pub async fn reset_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2,
                    reset_token_hash = NULL, reset_token_expires_at = NULL,
                    updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the account status (ACTIF/INACTIF soft delete).
    ///
    /// Returns the updated row, or `None` if no such user exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
