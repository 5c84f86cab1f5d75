//! Dossier (case file) model and DTOs.

use lexcase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full dossier row from the `dossiers` table.
///
/// `numero_unique` is the immutable business key (`{prefix}{year}{seq:04}`);
/// no update path ever touches it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dossier {
    pub id: DbId,
    pub numero_unique: String,
    pub title: String,
    pub dossier_type: String,
    pub description: Option<String>,
    pub status: String,
    pub client_id: DbId,
    pub responsable_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for the numbering transaction. The `numero_unique` itself
/// is computed inside [`DossierRepo::create_numbered`].
///
/// [`DossierRepo::create_numbered`]: crate::repositories::DossierRepo::create_numbered
#[derive(Debug, Clone)]
pub struct CreateDossier {
    pub title: String,
    pub dossier_type: String,
    pub description: Option<String>,
    pub status: String,
    pub client_id: DbId,
    pub responsable_id: Option<DbId>,
}

/// DTO for updating a dossier. Only non-`None` fields are applied;
/// `numero_unique` is deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDossier {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    pub responsable_id: Option<DbId>,
}

/// Filter parameters for listing dossiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DossierFilter {
    pub status: Option<String>,
    pub dossier_type: Option<String>,
    pub client_id: Option<DbId>,
    pub responsable_id: Option<DbId>,
}
