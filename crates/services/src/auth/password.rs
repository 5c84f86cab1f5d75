//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with Argon2id (default params) and a fresh
/// random salt, returning the PHC-formatted string for storage.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// `Ok(false)` means the password does not match; any other failure (a
/// malformed hash, say) surfaces as an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Returns `Ok(())` when the password is acceptable, or `Err` with a
/// human-readable explanation.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("avocat-secret-2026").expect("hashing should succeed");

        // Params and salt travel inside the PHC string.
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password("avocat-secret-2026", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password("same-input").expect("hashing should succeed");
        let b = hash_password("same-input").expect("hashing should succeed");
        assert_ne!(a, b, "two hashes of one password must differ by salt");
    }

    #[test]
    fn test_mismatched_password_is_rejected() {
        let hash = hash_password("droit-civil").expect("hashing should succeed");
        assert!(!verify_password("droit-penal", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password_strength("short");
        assert!(result.is_err());
        let msg = result.unwrap_err();
        assert!(
            msg.contains("at least 8 characters"),
            "error message should state the minimum length"
        );
    }

    #[test]
    fn test_password_meets_minimum() {
        // Exactly at the minimum boundary.
        assert!(validate_password_strength("12345678").is_ok());

        // Above the minimum.
        assert!(validate_password_strength("this-is-a-long-enough-password").is_ok());
    }
}
