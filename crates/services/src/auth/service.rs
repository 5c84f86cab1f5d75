//! Session and identity lifecycle: login, refresh, logout, staff
//! registration, and the password-reset flow.

use std::sync::Arc;

use chrono::{Duration, Utc};
use lexcase_core::error::CoreError;
use lexcase_core::roles::{is_allowed, Action, Role};
use lexcase_core::status::AccountStatus;
use lexcase_core::types::DbId;
use lexcase_db::models::user::{CreateUser, SafeUser};
use lexcase_db::repositories::UserRepo;
use lexcase_db::DbPool;
use lexcase_mail::{password_reset_email, Mailer};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{jwt, password};
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// Generic login failure message. The same text is returned for an unknown
/// email, a wrong password, and a deactivated account so that none of those
/// cases can be told apart from the outside.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Generic reply to a password-reset request, returned whether or not the
/// address matches an account.
const RESET_REQUESTED: &str =
    "If an account exists for this address, a password reset email has been sent";

/// Access + refresh token pair issued on login and registration.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload for creating a staff account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Authentication and account-lifecycle service.
#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    config: Arc<ServiceConfig>,
    mailer: Option<Mailer>,
}

impl AuthService {
    pub fn new(pool: DbPool, config: Arc<ServiceConfig>, mailer: Option<Mailer>) -> Self {
        Self {
            pool,
            config,
            mailer,
        }
    }

    /// Check an email/password pair against the user store.
    ///
    /// Fails with the same [`CoreError::Unauthorized`] message for unknown
    /// emails, wrong passwords, and deactivated accounts.
    pub async fn validate_credentials(
        &self,
        email: &str,
        plain_password: &str,
    ) -> ServiceResult<SafeUser> {
        let email = email.trim().to_lowercase();

        let Some(user) = UserRepo::find_by_email(&self.pool, &email).await? else {
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        };

        if user.status != AccountStatus::Actif.as_str() {
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        }

        let verified = password::verify_password(plain_password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Password verification failed: {e}")))?;
        if !verified {
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        }

        Ok(user.into())
    }

    /// Issue a fresh token pair for an already-validated user and persist the
    /// refresh-token digest, invalidating any previously issued refresh token.
    pub async fn login(&self, user: &SafeUser) -> ServiceResult<TokenPair> {
        let access_token =
            jwt::generate_access_token(user.id, &user.email, &user.role, &self.config.jwt)
                .map_err(|e| ServiceError::Internal(format!("Token generation failed: {e}")))?;
        let refresh_token =
            jwt::generate_refresh_token(user.id, &user.email, &user.role, &self.config.jwt)
                .map_err(|e| ServiceError::Internal(format!("Token generation failed: {e}")))?;

        let updated =
            UserRepo::set_refresh_token(&self.pool, user.id, &jwt::token_digest(&refresh_token))
                .await?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "user",
                id: user.id,
            }
            .into());
        }

        tracing::info!(user_id = user.id, email = %user.email, "User logged in");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The presented token must match the stored digest exactly; a token
    /// superseded by a newer login or cleared by logout is rejected even if
    /// its signature is still valid.
    pub async fn refresh(&self, user_id: DbId, refresh_token: &str) -> ServiceResult<String> {
        let unauthorized =
            || CoreError::Unauthorized("Invalid or expired refresh token".to_string());

        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(unauthorized)?;

        let stored = user.refresh_token_hash.as_deref().ok_or_else(unauthorized)?;
        if stored != jwt::token_digest(refresh_token) {
            return Err(unauthorized().into());
        }

        // Signature and expiry check after the digest match, so a forged
        // token never reaches the comparison with a hint of validity.
        let claims = jwt::validate_token(refresh_token, &self.config.jwt)
            .map_err(|_| unauthorized())?;

        let access_token =
            jwt::generate_access_token(claims.sub, &claims.email, &claims.role, &self.config.jwt)
                .map_err(|e| ServiceError::Internal(format!("Token generation failed: {e}")))?;
        Ok(access_token)
    }

    /// Invalidate the user's refresh token. Idempotent: logging out twice,
    /// or with no active session, succeeds silently.
    pub async fn logout(&self, user_id: DbId) -> ServiceResult<()> {
        UserRepo::clear_refresh_token(&self.pool, user_id).await?;
        tracing::info!(user_id, "User logged out");
        Ok(())
    }

    /// Create a staff account on behalf of `current_user` and log the new
    /// account in immediately.
    pub async fn register(
        &self,
        current_user: &SafeUser,
        input: RegisterInput,
    ) -> ServiceResult<(SafeUser, TokenPair)> {
        input.validate()?;

        let current_role = Role::parse(&current_user.role)
            .ok_or_else(|| CoreError::Internal(format!("Unknown role: {}", current_user.role)))?;
        if !is_allowed(current_role, Action::CreateStaffAccount) {
            return Err(CoreError::Forbidden(
                "Not allowed to create staff accounts".to_string(),
            )
            .into());
        }

        let role = Role::parse(&input.role)
            .ok_or_else(|| CoreError::Validation(format!("Unknown role: {}", input.role)))?;

        password::validate_password_strength(&input.password).map_err(CoreError::Validation)?;

        let email = input.email.trim().to_lowercase();
        if UserRepo::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(CoreError::Conflict("Email is already in use".to_string()).into());
        }

        let password_hash = password::hash_password(&input.password)
            .map_err(|e| ServiceError::Internal(format!("Password hashing failed: {e}")))?;

        let created = UserRepo::create(
            &self.pool,
            &CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email,
                password_hash,
                role: role.as_str().to_string(),
            },
        )
        .await?;

        tracing::info!(
            user_id = created.id,
            email = %created.email,
            role = %created.role,
            created_by = current_user.id,
            "Staff account created"
        );

        let safe: SafeUser = created.into();
        let tokens = self.login(&safe).await?;
        Ok((safe, tokens))
    }

    /// Start a password reset for the given email address.
    ///
    /// Always returns the same message. When the address matches an active
    /// account, a single-use reset token is stored (digest + expiry) and a
    /// reset link is emailed; mail failures are logged, never surfaced.
    pub async fn forgot_password(&self, email: &str) -> ServiceResult<&'static str> {
        let email = email.trim().to_lowercase();

        let user = match UserRepo::find_by_email(&self.pool, &email).await? {
            Some(user) if user.status == AccountStatus::Actif.as_str() => user,
            _ => return Ok(RESET_REQUESTED),
        };

        let token = jwt::generate_reset_token(user.id, &user.email, &self.config.jwt)
            .map_err(|e| ServiceError::Internal(format!("Token generation failed: {e}")))?;
        let expires_at =
            Utc::now() + Duration::minutes(self.config.jwt.reset_token_expiry_mins);

        UserRepo::set_reset_token(&self.pool, user.id, &jwt::token_digest(&token), expires_at)
            .await?;

        match &self.mailer {
            Some(mailer) => {
                let reset_url = format!("{}/reset-password?token={token}", self.config.app_url);
                let (subject, body) = password_reset_email(&user.first_name, &reset_url);
                if let Err(e) = mailer.send(&user.email, &subject, &body).await {
                    tracing::error!(user_id = user.id, error = %e, "Password reset email failed");
                }
            }
            None => {
                tracing::warn!(user_id = user.id, "Mail delivery disabled, reset link not sent");
            }
        }

        Ok(RESET_REQUESTED)
    }

    /// Complete a password reset with a token from a reset link.
    ///
    /// The token must carry a valid signature, match the stored digest
    /// (latest request wins), and fall within the stored expiry. On success,
    /// both reset fields are cleared so the link cannot be replayed.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ServiceResult<()> {
        let unauthorized = || CoreError::Unauthorized("Invalid or expired reset link".to_string());

        password::validate_password_strength(new_password).map_err(CoreError::Validation)?;

        let claims =
            jwt::validate_reset_token(token, &self.config.jwt).map_err(|_| unauthorized())?;

        let user = UserRepo::find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or_else(unauthorized)?;

        let stored = user.reset_token_hash.as_deref().ok_or_else(unauthorized)?;
        if stored != jwt::token_digest(token) {
            return Err(unauthorized().into());
        }

        match user.reset_token_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(unauthorized().into()),
        }

        let password_hash = password::hash_password(new_password)
            .map_err(|e| ServiceError::Internal(format!("Password hashing failed: {e}")))?;

        let updated = UserRepo::reset_password(&self.pool, user.id, &password_hash).await?;
        if !updated {
            return Err(unauthorized().into());
        }

        tracing::info!(user_id = user.id, "Password reset completed");
        Ok(())
    }

    /// Return the profile of the authenticated user.
    pub async fn me(&self, user_id: DbId) -> ServiceResult<SafeUser> {
        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("User not found".to_string()))?;
        Ok(user.into())
    }
}
