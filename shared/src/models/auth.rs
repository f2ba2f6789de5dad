//! Auth payloads

use serde::{Deserialize, Serialize};

use super::User;
use crate::access::CapabilitySummary;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub user: User,
    pub capabilities: CapabilitySummary,
}

/// `GET /api/auth/me` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
    pub capabilities: CapabilitySummary,
}

/// Switch active location; `None` returns to agency-wide work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchLocationRequest {
    pub location_id: Option<i64>,
}
