//! Account roles carried by the role cookie.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of account types the backend assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    CompanyUser,
    PersonaUser,
    Admin,
}

impl Role {
    /// Parse a cookie value. Anything outside the closed set yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CompanyUser" => Some(Role::CompanyUser),
            "PersonaUser" => Some(Role::PersonaUser),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CompanyUser => "CompanyUser",
            Role::PersonaUser => "PersonaUser",
            Role::Admin => "Admin",
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, Role::CompanyUser)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("CompanyUser"), Some(Role::CompanyUser));
        assert_eq!(Role::parse("PersonaUser"), Some(Role::PersonaUser));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
    }

    #[test]
    fn test_unknown_values() {
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("companyuser"), None);
        assert_eq!(Role::parse("Admin "), None);
        assert_eq!(Role::parse("%00"), None);
    }

    #[test]
    fn test_display_matches_cookie_value() {
        for role in [Role::CompanyUser, Role::PersonaUser, Role::Admin] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }
}
