//! Roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role of a user, stored and transported as its display string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Network Administrator")]
    NetworkAdministrator,
    #[serde(rename = "Agency Administrator")]
    AgencyAdministrator,
    #[serde(rename = "Agent")]
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [
        Role::NetworkAdministrator,
        Role::AgencyAdministrator,
        Role::Agent,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::NetworkAdministrator => "Network Administrator",
            Role::AgencyAdministrator => "Agency Administrator",
            Role::Agent => "Agent",
        }
    }

    /// Exact-match parse; anything else is "no role"
    pub fn parse(value: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == value)
    }

    /// Roles a user holding this role may hand out
    pub const fn allowed_roles_to_assign(&self) -> &'static [Role] {
        match self {
            Role::NetworkAdministrator => &[
                Role::NetworkAdministrator,
                Role::AgencyAdministrator,
                Role::Agent,
            ],
            Role::AgencyAdministrator => &[Role::AgencyAdministrator, Role::Agent],
            Role::Agent => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_strings() {
        assert_eq!(
            Role::parse("Network Administrator"),
            Some(Role::NetworkAdministrator)
        );
        assert_eq!(
            Role::parse("Agency Administrator"),
            Some(Role::AgencyAdministrator)
        );
        assert_eq!(Role::parse("Agent"), Some(Role::Agent));
    }

    #[test]
    fn test_parse_rejects_near_misses() {
        for value in ["", "agent", "AGENT", " Agent", "Admin", "Network Admin"] {
            assert_eq!(Role::parse(value), None, "{value:?}");
        }
        assert!("Supervisor".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&Role::AgencyAdministrator).unwrap();
        assert_eq!(json, "\"Agency Administrator\"");
        let role: Role = serde_json::from_str("\"Agent\"").unwrap();
        assert_eq!(role, Role::Agent);
    }

    #[test]
    fn test_assignable_roles_are_nested() {
        let na = Role::NetworkAdministrator.allowed_roles_to_assign();
        let aa = Role::AgencyAdministrator.allowed_roles_to_assign();
        let agent = Role::Agent.allowed_roles_to_assign();

        assert_eq!(na.len(), 3);
        assert!(aa.iter().all(|r| na.contains(r)));
        assert!(agent.iter().all(|r| aa.contains(r)));
        assert!(agent.is_empty());
        assert!(!aa.contains(&Role::NetworkAdministrator));
    }
}
