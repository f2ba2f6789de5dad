//! User Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use shared::access::Role;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserCreate, UserQuery, UserRoleUpdate, UserStatusUpdate};

use crate::api::{ensure_location_of, owning_agency};
use crate::auth::{CurrentUser, hash_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_USERNAME_LEN, validate_password, validate_required_text,
};

/// GET /api/users
///
/// Network administrators may filter by agency; everyone else sees the
/// users of their own agency and active location.
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<User>>> {
    let caps = &current_user.capabilities;
    if caps.flags.can_manage_agencies {
        return Ok(Json(user::find_all(&state.pool, query.company_id).await?));
    }

    let users = user::find_all(&state.pool, Some(current_user.company_id()))
        .await?
        .into_iter()
        .filter(|u| caps.in_scope(u))
        .collect();
    Ok(Json(users))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    let username = payload.username.trim();
    validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    validate_password(&payload.password)?;
    let display_name = match payload.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            validate_required_text(name, "display_name", MAX_NAME_LEN)?;
            name
        }
        _ => username,
    };

    let role = parse_role(&payload.property_role)?;
    ensure_assignable(&current_user, role)?;

    let company = owning_agency(&state, &current_user, payload.company_id).await?;

    if let Some(location_id) = payload.active_location {
        ensure_location_of(&state, company.id, location_id).await?;
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(
        &state.pool,
        user::NewUser {
            username,
            display_name,
            password_hash: &password_hash,
            property_role: role.as_str(),
            company_id: company.id,
            active_location: payload.active_location,
        },
    )
    .await?;

    tracing::info!(
        user_id = created.id,
        username = %created.username,
        role = %role,
        created_by = current_user.id(),
        "User created"
    );
    Ok(Json(created))
}

/// PUT /api/users/{id}/role
pub async fn update_role(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserRoleUpdate>,
) -> AppResult<Json<User>> {
    let target = load(&state, id).await?;
    if !current_user.capabilities.can_modify_user(&target) {
        return Err(modify_denied(&current_user, &target));
    }

    let role = parse_role(&payload.property_role)?;
    ensure_assignable(&current_user, role)?;

    let updated = user::update_role(&state.pool, id, role.as_str()).await?;
    tracing::info!(
        user_id = id,
        role = %role,
        changed_by = current_user.id(),
        "User role changed"
    );
    Ok(Json(updated))
}

/// PUT /api/users/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserStatusUpdate>,
) -> AppResult<Json<User>> {
    let target = load(&state, id).await?;
    current_user.ensure_in_scope(&target)?;

    if !current_user.capabilities.can_update_status(&target) {
        return Err(modify_denied(&current_user, &target));
    }
    if target.id == current_user.id() && !payload.is_active {
        return Err(AppError::new(ErrorCode::CannotDeactivateSelf));
    }

    let updated = user::update_status(&state.pool, id, payload.is_active).await?;
    tracing::info!(
        user_id = id,
        is_active = payload.is_active,
        changed_by = current_user.id(),
        "User status changed"
    );
    Ok(Json(updated))
}

async fn load(state: &ServerState, id: i64) -> AppResult<User> {
    user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id))
}

fn parse_role(value: &str) -> AppResult<Role> {
    Role::parse(value).ok_or_else(|| {
        AppError::validation(format!("Unknown role: {value}")).with_detail("property_role", value)
    })
}

fn ensure_assignable(current_user: &CurrentUser, role: Role) -> AppResult<()> {
    if current_user.capabilities.can_assign_role(role) {
        return Ok(());
    }
    Err(AppError::new(ErrorCode::RoleNotAssignable).with_detail("property_role", role.as_str()))
}

fn modify_denied(current_user: &CurrentUser, target: &User) -> AppError {
    if target.role() == Some(Role::NetworkAdministrator) {
        return AppError::new(ErrorCode::CannotModifyNetworkAdmin).with_detail("id", target.id);
    }
    if !current_user.capabilities.in_scope(target) {
        return AppError::out_of_scope();
    }
    AppError::permission_denied("Not allowed to modify this user")
}
