//! Staff roles and the permission table.
//!
//! Authorization is data-driven: each [`Action`] maps to the set of roles
//! allowed to perform it, so a gate is a single table lookup instead of an
//! ad-hoc membership check scattered across the services.

use serde::{Deserialize, Serialize};

/// Staff role, stored as TEXT in the `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "DG")]
    Dg,
    #[serde(rename = "AVOCAT")]
    Avocat,
    #[serde(rename = "SECRETAIRE")]
    Secretaire,
    #[serde(rename = "ASSISTANT")]
    Assistant,
    #[serde(rename = "STAGIAIRE")]
    Stagiaire,
}

impl Role {
    /// Database representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Dg => "DG",
            Role::Avocat => "AVOCAT",
            Role::Secretaire => "SECRETAIRE",
            Role::Assistant => "ASSISTANT",
            Role::Stagiaire => "STAGIAIRE",
        }
    }

    /// Parse a database value back into a role.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "DG" => Some(Role::Dg),
            "AVOCAT" => Some(Role::Avocat),
            "SECRETAIRE" => Some(Role::Secretaire),
            "ASSISTANT" => Some(Role::Assistant),
            "STAGIAIRE" => Some(Role::Stagiaire),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new staff account (register).
    CreateStaffAccount,
    /// Deactivate a staff account (soft delete to INACTIF).
    DeactivateStaffAccount,
}

/// Permission table: which roles may perform which action.
const PERMISSIONS: &[(Action, &[Role])] = &[
    (
        Action::CreateStaffAccount,
        &[Role::Admin, Role::Dg, Role::Avocat, Role::Secretaire],
    ),
    (Action::DeactivateStaffAccount, &[Role::Admin, Role::Dg]),
];

/// Look up whether `role` is allowed to perform `action`.
pub fn is_allowed(role: Role, action: Action) -> bool {
    PERMISSIONS
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, roles)| roles.contains(&role))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Admin,
            Role::Dg,
            Role::Avocat,
            Role::Secretaire,
            Role::Assistant,
            Role::Stagiaire,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("JUGE"), None);
    }

    #[test]
    fn test_create_staff_account_gate() {
        assert!(is_allowed(Role::Admin, Action::CreateStaffAccount));
        assert!(is_allowed(Role::Dg, Action::CreateStaffAccount));
        assert!(is_allowed(Role::Avocat, Action::CreateStaffAccount));
        assert!(is_allowed(Role::Secretaire, Action::CreateStaffAccount));
        assert!(!is_allowed(Role::Assistant, Action::CreateStaffAccount));
        assert!(!is_allowed(Role::Stagiaire, Action::CreateStaffAccount));
    }

    #[test]
    fn test_deactivate_gate_is_tighter() {
        assert!(is_allowed(Role::Admin, Action::DeactivateStaffAccount));
        assert!(!is_allowed(Role::Secretaire, Action::DeactivateStaffAccount));
    }
}
