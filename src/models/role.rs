use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role labels accepted by the directory backend. The set is closed; any
/// other value is rejected by validation before a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Moderator,
    Editor,
    Manager,
    Viewer,
    Developer,
    Tester,
    Contributor,
}

impl Role {
    /// Every role, in the order the dashboard's dropdowns list them.
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::User,
        Role::Moderator,
        Role::Editor,
        Role::Manager,
        Role::Viewer,
        Role::Developer,
        Role::Tester,
        Role::Contributor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Editor => "editor",
            Role::Manager => "manager",
            Role::Viewer => "viewer",
            Role::Developer => "developer",
            Role::Tester => "tester",
            Role::Contributor => "contributor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Role::ALL
            .iter()
            .find(|r| r.as_str() == lowered)
            .copied()
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Role restriction used by the list filter. `All` is the sentinel behind
/// the "All Roles" option in the dashboard's dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    /// Parse a filter value from a query string or CLI flag. Empty, "all"
    /// and unrecognized values all mean "no restriction".
    pub fn parse(raw: &str) -> RoleFilter {
        match Role::from_str(raw) {
            Ok(role) => RoleFilter::Only(role),
            Err(_) => RoleFilter::All,
        }
    }

    pub fn matches(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(only) => *only == role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("  viewer ").unwrap(), Role::Viewer);
    }

    #[test]
    fn role_parse_rejects_unknown_labels() {
        assert!(Role::from_str("superuser").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn filter_parse_falls_back_to_all() {
        assert_eq!(RoleFilter::parse("all"), RoleFilter::All);
        assert_eq!(RoleFilter::parse(""), RoleFilter::All);
        assert_eq!(RoleFilter::parse("admin"), RoleFilter::Only(Role::Admin));
    }
}
