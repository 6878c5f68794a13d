// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account roles.
///
/// The ledger's `type` field on the user record carries the role. There is
/// no hierarchy: a club is not a superset of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Individual student wallet
    Student,
    /// Club wallet, operated by club staff
    Club,
}

impl Role {
    /// Parse role from string (case-insensitive).
    /// Used when reading the ledger's account `type`.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "student" | "user" => Some(Role::Student),
            "club" => Some(Role::Club),
            _ => None,
        }
    }

    /// The other role.
    pub fn complement(self) -> Role {
        match self {
            Role::Student => Role::Club,
            Role::Club => Role::Student,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Club => write!(f, "club"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("club"), Some(Role::Club));
        assert_eq!(Role::from_str("CLUB"), Some(Role::Club));
        assert_eq!(Role::from_str("Student"), Some(Role::Student));
        assert_eq!(Role::from_str("user"), Some(Role::Student));
        assert_eq!(Role::from_str("admin"), None);
    }

    #[test]
    fn complement_swaps_roles() {
        assert_eq!(Role::Student.complement(), Role::Club);
        assert_eq!(Role::Club.complement(), Role::Student);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Club).unwrap(), "club");
        assert_eq!(Role::Student.to_string(), "student");
    }
}
