//! Client (represented person or company) model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// DTO for updating a client. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Filter parameters for listing clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub status: Option<String>,
    /// Case-insensitive substring match on first name, last name, or company.
    pub search: Option<String>,
}
