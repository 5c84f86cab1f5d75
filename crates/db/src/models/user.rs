//! Staff account model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and token digests -- NEVER serialize this to
/// external output directly. Use [`SafeUser`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub refresh_token_hash: Option<String>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// External-facing user representation: no hash, no token material.
#[derive(Debug, Clone, Serialize)]
pub struct SafeUser {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        SafeUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Filter parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    pub status: Option<String>,
}
