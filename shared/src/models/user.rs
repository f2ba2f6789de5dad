//! User Model

use serde::{Deserialize, Serialize};

use crate::access::{Principal, Role, Scoped};

/// User account (without password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Role wire string; unknown values are kept as-is and grant nothing
    pub property_role: String,
    /// Agency the user belongs to
    pub company_id: i64,
    /// Location (sub-agency) the user is currently working in
    pub active_location: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.property_role)
    }

    /// Acting identity of this user for the capability resolver
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role(),
            company_id: self.company_id,
            active_location: self.active_location,
            is_active: self.is_active,
        }
    }
}

impl Scoped for User {
    fn agency_id(&self) -> i64 {
        self.company_id
    }

    fn location_id(&self) -> Option<i64> {
        self.active_location
    }

    fn owner_id(&self) -> Option<i64> {
        None
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub property_role: String,
    /// Target agency; defaults to the acting user's agency
    pub company_id: Option<i64>,
    pub active_location: Option<i64>,
}

/// Role change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleUpdate {
    pub property_role: String,
}

/// Activate / deactivate payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusUpdate {
    pub is_active: bool,
}

/// Filter for user listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    /// Only honoured for network administrators
    pub company_id: Option<i64>,
}
