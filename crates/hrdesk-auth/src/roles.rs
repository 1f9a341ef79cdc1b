//! Roles and the authorization check.

use std::fmt;
use std::str::FromStr;

use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};

use crate::claims::Claims;

const FORBIDDEN: &str = "Forbidden: Insufficient permissions";

/// Role stored on a user and embedded in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Accountant,
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Accountant, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Accountant => "Accountant",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid role: {}", s)))
    }
}

/// Rejects with 403 unless the claims carry exactly `required`.
pub fn check_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    check_any_role(claims, &[required])
}

/// Rejects with 403 unless the claims' role is in `allowed`.
///
/// An empty `allowed` set rejects everyone.
pub fn check_any_role(claims: &Claims, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(FORBIDDEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "00000000-0000-0000-0000-000000000000".to_string(),
            email: "test@example.com".to_string(),
            role,
            iat: 1234567890,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_manager_rejected_by_admin_only() {
        let err = check_any_role(&claims(Role::Manager), &[Role::Admin]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(err.public_message(), "Forbidden: Insufficient permissions");
    }

    #[test]
    fn test_manager_accepted_by_admin_or_manager() {
        assert!(check_any_role(&claims(Role::Manager), &[Role::Admin, Role::Manager]).is_ok());
    }

    #[test]
    fn test_empty_role_set_rejects() {
        assert!(check_any_role(&claims(Role::Admin), &[]).is_err());
    }

    #[test]
    fn test_check_role_exact() {
        assert!(check_role(&claims(Role::Accountant), Role::Accountant).is_ok());
        assert!(check_role(&claims(Role::Employee), Role::Admin).is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" MANAGER ".parse::<Role>().unwrap(), Role::Manager);
        assert!("intern".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
