//! Profile roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The role a profile holds in the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 운영자. Top-level administrator; may grant the operator role.
    Operator,
    /// 관리자.
    Admin,
    /// 콜센터.
    Callcenter,
    /// 현장. Default role for new sign-ups.
    Field,
}

impl Role {
    /// Every role, in listing order.
    pub const ALL: [Role; 4] = [Role::Operator, Role::Admin, Role::Callcenter, Role::Field];

    /// Returns the storage code for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Admin => "admin",
            Role::Callcenter => "callcenter",
            Role::Field => "field",
        }
    }

    /// Returns the Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Operator => "운영자",
            Role::Admin => "관리자",
            Role::Callcenter => "콜센터",
            Role::Field => "현장",
        }
    }

    /// Returns `true` for operator and admin.
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Operator | Role::Admin)
    }

    /// Sort rank used by profile listings: operator, admin, everyone else.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Operator => 0,
            Role::Admin => 1,
            Role::Callcenter | Role::Field => 2,
        }
    }

    /// Parses a role from its code or its Korean label.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed) || r.label() == trimmed)
            .ok_or_else(|| ValidationError::UnknownRole {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_code_and_label() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("OPERATOR").unwrap(), Role::Operator);
        assert_eq!(Role::parse("콜센터").unwrap(), Role::Callcenter);
        assert!(Role::parse("guest").is_err());
    }

    #[test]
    fn test_role_administrators() {
        assert!(Role::Operator.is_administrator());
        assert!(Role::Admin.is_administrator());
        assert!(!Role::Callcenter.is_administrator());
        assert!(!Role::Field.is_administrator());
    }

    #[test]
    fn test_role_rank_order() {
        assert!(Role::Operator.rank() < Role::Admin.rank());
        assert!(Role::Admin.rank() < Role::Field.rank());
        assert_eq!(Role::Field.rank(), Role::Callcenter.rank());
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Callcenter).unwrap();
        assert_eq!(json, "\"callcenter\"");
        let role: Role = serde_json::from_str("\"field\"").unwrap();
        assert_eq!(role, Role::Field);
    }
}
