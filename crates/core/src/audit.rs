//! Audit trail constants and redaction helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and the services.

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known actions for audit log entries.
pub mod actions {
    pub const CREATION: &str = "CREATION";
    pub const MODIFICATION: &str = "MODIFICATION";
    pub const SUPPRESSION: &str = "SUPPRESSION";
    pub const ASSIGNATION: &str = "ASSIGNATION";
    pub const CHANGEMENT_STATUT: &str = "CHANGEMENT_STATUT";
}

/// Known target entity types for audit log entries.
pub mod entity_types {
    pub const DOSSIER: &str = "DOSSIER";
    pub const CLIENT: &str = "CLIENT";
    pub const UTILISATEUR: &str = "UTILISATEUR";
    pub const DOCUMENT: &str = "DOCUMENT";
    pub const NOTE: &str = "NOTE";
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Keys that must never appear in stored audit snapshots.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_hash",
    "token",
    "refresh_token",
    "reset_token",
    "secret",
];

/// Redact sensitive fields from a JSON value before it is written to the
/// audit log. Matching is case-insensitive on key substrings and recurses
/// into nested objects and arrays.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_credential_fields() {
        let snapshot = json!({
            "email": "a@b.fr",
            "password_hash": "$argon2id$...",
            "refreshToken": "eyJ...",
            "nested": { "reset_token_hash": "abc" }
        });
        let redacted = redact_sensitive_fields(&snapshot);
        assert_eq!(redacted["email"], "a@b.fr");
        assert_eq!(redacted["password_hash"], "[REDACTED]");
        assert_eq!(redacted["refreshToken"], "[REDACTED]");
        assert_eq!(redacted["nested"]["reset_token_hash"], "[REDACTED]");
    }

    #[test]
    fn test_non_objects_pass_through() {
        assert_eq!(redact_sensitive_fields(&json!(42)), json!(42));
        assert_eq!(redact_sensitive_fields(&json!("x")), json!("x"));
    }
}
