//! Explicit caller context for role-gated ledger access.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Anything that is not `admin` is treated as a regular employee.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Employee
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    user_id: String,
    role: Role,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn employee(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Employee)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }

        tracing::warn!(user_id = %self.user_id, "Ledger access denied");
        Err(LedgerError::Forbidden {
            user_id: self.user_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_role_parses_as_admin() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" Admin "), Role::Admin);
        assert_eq!(Role::parse("employee"), Role::Employee);
        assert_eq!(Role::parse(""), Role::Employee);
        assert_eq!(Role::parse("administrator"), Role::Employee);
    }

    #[test]
    fn employees_are_rejected() {
        assert!(SessionContext::admin("owner").require_admin().is_ok());

        let err = SessionContext::employee("clerk").require_admin().unwrap_err();
        assert!(matches!(err, LedgerError::Forbidden { ref user_id } if user_id == "clerk"));
    }
}
