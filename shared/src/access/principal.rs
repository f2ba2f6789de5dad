//! Acting identity

use serde::{Deserialize, Serialize};

use super::Role;

/// Who is acting: built from the stored user row, on the server per
/// request and on the client at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    /// `None` when the stored role string is not recognised
    pub role: Option<Role>,
    pub company_id: i64,
    pub active_location: Option<i64>,
    pub is_active: bool,
}
