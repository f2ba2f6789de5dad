//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, MeResponse, SwitchLocationRequest, User};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::{agency, user};
use crate::security_log;

/// Fixed delay before answering a login, whatever the outcome
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Unknown usernames and wrong passwords get the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim().to_string();
    let found = user::find_by_username_with_hash(&state.pool, &username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match found {
        Some((user, password_hash)) => {
            let valid = verify_password(&req.password, &password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !valid {
                security_log!(
                    WARN,
                    "login_failed",
                    username = %username,
                    reason = "invalid_password"
                );
                return Err(AppError::invalid_credentials());
            }
            if !user.is_active {
                security_log!(
                    WARN,
                    "login_failed",
                    username = %username,
                    reason = "account_disabled"
                );
                return Err(AppError::account_disabled());
            }
            user
        }
        None => {
            security_log!(
                WARN,
                "login_failed",
                username = %username,
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %user.property_role,
        "User logged in"
    );

    issue_session(&state, user).map(Json)
}

/// GET /api/auth/me
pub async fn me(current_user: CurrentUser) -> Json<MeResponse> {
    let capabilities = current_user.capabilities.summary();
    Json(MeResponse {
        user: current_user.user,
        capabilities,
    })
}

/// POST /api/auth/location
///
/// `location_id: null` returns the user to agency-wide scope. The token is
/// reissued so the client's claims match the new scope.
pub async fn switch_location(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<SwitchLocationRequest>,
) -> AppResult<Json<LoginResponse>> {
    if let Some(location_id) = req.location_id {
        let location = agency::find_by_id(&state.pool, location_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::AgencyNotFound).with_detail("location_id", location_id)
            })?;

        if location.parent_id != Some(current_user.company_id()) {
            security_log!(
                WARN,
                "location_switch_denied",
                user_id = current_user.id(),
                location_id = location_id
            );
            return Err(AppError::new(ErrorCode::LocationNotInAgency)
                .with_detail("location_id", location_id));
        }
    }

    let user = user::update_active_location(&state.pool, current_user.id(), req.location_id).await?;
    tracing::info!(user_id = user.id, location_id = ?user.active_location, "Active location switched");

    issue_session(&state, user).map(Json)
}

fn issue_session(state: &ServerState, user: User) -> AppResult<LoginResponse> {
    let token = state
        .jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    let capabilities = CurrentUser::new(user.clone()).capabilities.summary();

    Ok(LoginResponse {
        token,
        expires_in: state.jwt_service().expires_in(),
        user,
        capabilities,
    })
}
