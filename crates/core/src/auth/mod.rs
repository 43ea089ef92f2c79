//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Operator role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Operator roles in the admin tool.
///
/// The office runs on a single trust tier; `admin` additionally manages
/// operator accounts and the course catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, manages operators and courses.
    Admin,
    /// Day-to-day enquiry, admission, and fee work.
    Staff,
}

impl UserRole {
    /// Returns true if this role can manage operator accounts.
    #[must_use]
    pub const fn can_manage_operators(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role can edit the course catalog.
    #[must_use]
    pub const fn can_manage_courses(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_operators());
        assert!(UserRole::Admin.can_manage_courses());
        assert!(!UserRole::Staff.can_manage_operators());
        assert!(!UserRole::Staff.can_manage_courses());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("Staff").unwrap(), UserRole::Staff);
        assert!(UserRole::from_str("owner").is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
