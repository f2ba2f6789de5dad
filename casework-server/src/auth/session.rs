//! Per-request session context

use http::Uri;

use shared::access::{Capabilities, Capability, Principal, Scoped};
use shared::error::{AppError, AppResult};
use shared::models::User;

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// The acting user, resolved once per request
///
/// Built from the database row named by the token subject, so the
/// capability bundle always reflects the current role and status.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub principal: Principal,
    pub capabilities: Capabilities,
}

impl CurrentUser {
    pub fn new(user: User) -> Self {
        let principal = user.principal();
        let capabilities = Capabilities::resolve(Some(&principal));
        Self {
            user,
            principal,
            capabilities,
        }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn company_id(&self) -> i64 {
        self.user.company_id
    }

    pub fn active_location(&self) -> Option<i64> {
        self.user.active_location
    }

    /// Fail with `PermissionDenied` unless the flag is granted
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.capabilities.has(capability) {
            return Ok(());
        }
        security_log!(
            WARN,
            "permission_denied",
            user_id = self.id(),
            username = %self.username(),
            capability = %capability
        );
        Err(AppError::permission_denied(format!(
            "Missing capability: {capability}"
        )))
    }

    /// Fail with `PermissionDenied` unless a predicate allowed `action`
    pub fn ensure(&self, allowed: bool, action: &str) -> AppResult<()> {
        if allowed {
            return Ok(());
        }
        security_log!(
            WARN,
            "permission_denied",
            user_id = self.id(),
            username = %self.username(),
            action = %action
        );
        Err(AppError::permission_denied(format!("Not allowed to {action}")))
    }

    /// Fail with `OutOfScope` when `target` lies outside the acting agency
    /// or location; network administrators see everything
    pub fn ensure_in_scope(&self, target: &impl Scoped) -> AppResult<()> {
        if self.capabilities.flags.can_manage_agencies || self.capabilities.in_scope(target) {
            return Ok(());
        }
        security_log!(
            WARN,
            "out_of_scope",
            user_id = self.id(),
            target_agency = target.agency_id()
        );
        Err(AppError::out_of_scope())
    }
}

/// Validate the bearer token and load the acting user
pub async fn authenticate(
    state: &ServerState,
    auth_header: Option<&str>,
    uri: &Uri,
) -> AppResult<CurrentUser> {
    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %uri);
            return Err(AppError::not_authenticated());
        }
    };

    let claims = state.jwt_service().validate_token(token).map_err(|e| {
        security_log!(WARN, "auth_failed", error = %e, uri = %uri);
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = claims
        .user_id()
        .map_err(|e| AppError::invalid_token(e.to_string()))?;

    let Some(user) = user::find_by_id(&state.pool, user_id).await? else {
        security_log!(WARN, "auth_unknown_user", user_id = user_id);
        return Err(AppError::invalid_token("Invalid token"));
    };

    if !user.is_active {
        security_log!(
            WARN,
            "account_disabled",
            user_id = user.id,
            username = %user.username
        );
        return Err(AppError::account_disabled());
    }

    Ok(CurrentUser::new(user))
}
