//! JWT generation and validation for access, refresh, and reset tokens.
//!
//! All three token kinds are HS256-signed JWTs sharing the same secret and
//! differing in payload and lifetime. Refresh and reset tokens are never
//! stored in plaintext; only their SHA-256 hex digest is persisted so a
//! database leak does not compromise active sessions or pending resets.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lexcase_core::types::DbId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email address.
    pub email: String,
    /// The user's role name (e.g. `"ADMIN"`, `"AVOCAT"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// JWT claims embedded in password-reset tokens. Deliberately omits the
/// role so a reset link grants nothing beyond the reset itself.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email address.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
    /// Password-reset token lifetime in minutes (default: 15).
    pub reset_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
/// Default password-reset token expiry in minutes.
const DEFAULT_RESET_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `JWT_SECRET`              | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | no       | `7`     |
    /// | `JWT_RESET_EXPIRY_MINS`   | no       | `15`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        let reset_token_expiry_mins: i64 = std::env::var("JWT_RESET_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_RESET_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_RESET_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
            reset_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiry_secs = config.access_token_expiry_mins * 60;
    encode_claims(user_id, email, role, expiry_secs, config)
}

/// Generate an HS256 refresh token for the given user.
///
/// Same payload as an access token but with a lifetime measured in days.
/// Only the [`token_digest`] of the returned string should be persisted.
pub fn generate_refresh_token(
    user_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiry_secs = config.refresh_token_expiry_days * 24 * 3600;
    encode_claims(user_id, email, role, expiry_secs, config)
}

fn encode_claims(
    user_id: DbId,
    email: &str,
    role: &str,
    expiry_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: now + expiry_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access or refresh token, returning the embedded
/// [`Claims`]. Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate an HS256 password-reset token for the given user.
pub fn generate_reset_token(
    user_id: DbId,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = ResetClaims {
        sub: user_id,
        email: email.to_string(),
        exp: now + config.reset_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a password-reset token.
pub fn validate_reset_token(
    token: &str,
    config: &JwtConfig,
) -> Result<ResetClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a token.
///
/// Use this to compare an incoming refresh or reset token against the
/// stored digest.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
            reset_token_expiry_mins: 15,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token(42, "jean@juridix.fr", "ADMIN", &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "jean@juridix.fr");
        assert_eq!(claims.role, "ADMIN");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let config = test_config();
        let access = generate_access_token(1, "a@b.fr", "AVOCAT", &config)
            .expect("token generation should succeed");
        let refresh = generate_refresh_token(1, "a@b.fr", "AVOCAT", &config)
            .expect("token generation should succeed");

        let access_claims = validate_token(&access, &config).expect("validation should succeed");
        let refresh_claims = validate_token(&refresh, &config).expect("validation should succeed");
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Manually create an already-expired token.
        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "a@b.fr".to_string(),
            role: "STAGIAIRE".to_string(),
            exp: now - 300, // expired 5 minutes ago (well past leeway)
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        let result = validate_token(&token, &config);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_reset_token_round_trip() {
        let config = test_config();
        let token = generate_reset_token(7, "marie@juridix.fr", &config)
            .expect("token generation should succeed");

        let claims =
            validate_reset_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "marie@juridix.fr");
    }

    #[test]
    fn test_reset_token_is_not_a_valid_access_token() {
        let config = test_config();
        let token = generate_reset_token(7, "marie@juridix.fr", &config)
            .expect("token generation should succeed");

        // The reset payload has no role claim, so access validation rejects it.
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_token_digest_is_stable() {
        let config = test_config();
        let token = generate_refresh_token(3, "x@y.fr", "SECRETAIRE", &config)
            .expect("token generation should succeed");

        let a = token_digest(&token);
        let b = token_digest(&token);
        assert_eq!(a, b, "digest of the same token must be stable");

        // Sanity: the digest should be a 64-char hex string (SHA-256).
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            ..test_config()
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };

        let token = generate_access_token(1, "a@b.fr", "AVOCAT", &config_a)
            .expect("token generation should succeed");

        let result = validate_token(&token, &config_b);
        assert!(
            result.is_err(),
            "token signed with a different secret must fail"
        );
    }
}
