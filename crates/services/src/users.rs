//! Staff account administration: listing, lookup, and status changes.

use lexcase_core::error::CoreError;
use lexcase_core::roles::{is_allowed, Action, Role};
use lexcase_core::status::AccountStatus;
use lexcase_core::types::DbId;
use lexcase_db::models::user::{SafeUser, UserFilter};
use lexcase_db::repositories::UserRepo;
use lexcase_db::DbPool;

use crate::error::ServiceResult;

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "user", id }
}

/// Staff account administration service.
#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List staff accounts, optionally filtered by role and/or status.
    pub async fn find_all(&self, filter: UserFilter) -> ServiceResult<Vec<SafeUser>> {
        let users = UserRepo::list(&self.pool, &filter).await?;
        Ok(users.into_iter().map(SafeUser::from).collect())
    }

    pub async fn find_one(&self, id: DbId) -> ServiceResult<SafeUser> {
        let user = UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(user.into())
    }

    /// Flip a staff account between ACTIF and INACTIF on behalf of
    /// `current_user`. Deactivation is reversible.
    pub async fn set_status(
        &self,
        current_user: &SafeUser,
        id: DbId,
        status: AccountStatus,
    ) -> ServiceResult<SafeUser> {
        let current_role = Role::parse(&current_user.role)
            .ok_or_else(|| CoreError::Internal(format!("Unknown role: {}", current_user.role)))?;
        if !is_allowed(current_role, Action::DeactivateStaffAccount) {
            return Err(CoreError::Forbidden(
                "Not allowed to change staff account status".to_string(),
            )
            .into());
        }

        if current_user.id == id && status == AccountStatus::Inactif {
            return Err(CoreError::Validation(
                "Cannot deactivate your own account".to_string(),
            )
            .into());
        }

        let user = UserRepo::update_status(&self.pool, id, status.as_str())
            .await?
            .ok_or_else(|| not_found(id))?;

        // A deactivated account must not keep a live session.
        if status == AccountStatus::Inactif {
            UserRepo::clear_refresh_token(&self.pool, id).await?;
        }

        tracing::info!(
            user_id = id,
            status = status.as_str(),
            changed_by = current_user.id,
            "Staff account status changed"
        );
        Ok(user.into())
    }
}
