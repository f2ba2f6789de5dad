//! Bed Request Handlers
//!
//! Route layers check the capability flag; each handler then loads the
//! record, applies scope and the record-level predicate, validates the
//! form and hands over to the transactional repository.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use shared::bed::validation::{
    validate_bed_assign, validate_bed_request, validate_check_in, validate_deny,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    BedAssignCreate, BedAssignment, BedCheckIn, BedCheckOut, BedDeny, BedRequestCreate,
    BedRequestQuery, BedRequestUpdate, BedScheduleCheckout, BedStayUpdate, Case, Site,
};

use crate::api::{load_case, load_site};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::bed_assignment::{self, ListFilter};

/// GET /api/bed-requests
///
/// Network administrators may filter by agency; everyone else is held to
/// their own agency and active location.
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<BedRequestQuery>,
) -> AppResult<Json<Vec<BedAssignment>>> {
    let caps = &current_user.capabilities;
    let filter = if caps.flags.can_manage_agencies {
        ListFilter {
            agency_id: query.agency_id,
            location_id: None,
            case_id: query.case_id,
            site_id: query.site_id,
            status: query.status,
        }
    } else {
        ListFilter {
            agency_id: Some(current_user.company_id()),
            location_id: current_user.active_location(),
            case_id: query.case_id,
            site_id: query.site_id,
            status: query.status,
        }
    };

    let records = bed_assignment::find_all(&state.pool, &filter)
        .await?
        .into_iter()
        .filter(|r| caps.can_view_bed_request(r))
        .collect();
    Ok(Json(records))
}

/// GET /api/bed-requests/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<BedAssignment>> {
    let record = load_in_scope(&state, &current_user, id).await?;
    current_user.ensure(
        current_user.capabilities.can_view_bed_request(&record),
        "view this bed request",
    )?;
    Ok(Json(record))
}

/// POST /api/bed-requests
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<BedRequestCreate>,
) -> AppResult<Json<BedAssignment>> {
    let form = validate_bed_request(&payload)?;
    let case = load_case(&state, &current_user, form.case_id).await?;
    let site = load_site(&state, &current_user, form.site_id).await?;
    ensure_same_agency(&case, &site)?;

    let created =
        bed_assignment::create_request(&state.pool, &case, &form, current_user.id()).await?;
    tracing::info!(
        assignment_id = created.id,
        case_id = case.id,
        site_id = site.id,
        created_by = current_user.id(),
        "Bed requested"
    );
    Ok(Json(created))
}

/// POST /api/bed-requests/assign
pub async fn assign(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<BedAssignCreate>,
) -> AppResult<Json<BedAssignment>> {
    let form = validate_bed_assign(&payload)?;
    let case = load_case(&state, &current_user, form.case_id).await?;
    let site = load_site(&state, &current_user, form.site_id).await?;
    ensure_same_agency(&case, &site)?;

    let created = bed_assignment::assign(&state.pool, &case, &form, current_user.id()).await?;
    Ok(Json(created))
}

/// PUT /api/bed-requests/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedRequestUpdate>,
) -> AppResult<Json<BedAssignment>> {
    let record = load_in_scope(&state, &current_user, id).await?;
    current_user.ensure(
        current_user.capabilities.can_edit_bed_request(&record),
        "edit this bed request",
    )?;
    if let Some(site_id) = payload.site_id {
        load_site(&state, &current_user, site_id).await?;
    }

    let updated = bed_assignment::update_request(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/bed-requests/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let record = load_in_scope(&state, &current_user, id).await?;
    current_user.ensure(
        current_user.capabilities.can_delete_bed_request(&record),
        "delete this bed request",
    )?;

    bed_assignment::delete(&state.pool, id).await?;
    tracing::info!(
        assignment_id = id,
        status = %record.status,
        deleted_by = current_user.id(),
        "Bed request deleted"
    );
    Ok(Json(true))
}

/// POST /api/bed-requests/{id}/check-in
pub async fn check_in(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedCheckIn>,
) -> AppResult<Json<BedAssignment>> {
    let record = load_in_scope(&state, &current_user, id).await?;
    current_user.ensure(
        current_user.capabilities.can_edit_bed_request(&record),
        "check in this bed request",
    )?;
    let form = validate_check_in(&payload)?;

    let updated = bed_assignment::check_in(&state.pool, id, &form).await?;
    Ok(Json(updated))
}

/// PUT /api/bed-requests/{id}/check-in
///
/// Edits the stay: check-in fields, bed, and check-out fields once checked
/// out.
pub async fn edit_check_in(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedStayUpdate>,
) -> AppResult<Json<BedAssignment>> {
    let record = load_in_scope(&state, &current_user, id).await?;
    current_user.ensure(
        current_user.capabilities.can_edit_bed_request(&record),
        "edit this stay",
    )?;

    let updated = bed_assignment::update_stay(&state.pool, id, &payload).await?;
    tracing::info!(assignment_id = id, changed_by = current_user.id(), "Stay edited");
    Ok(Json(updated))
}

/// POST /api/bed-requests/{id}/schedule-checkout
pub async fn schedule_checkout(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedScheduleCheckout>,
) -> AppResult<Json<BedAssignment>> {
    load_in_scope(&state, &current_user, id).await?;

    let updated = bed_assignment::schedule_checkout(&state.pool, id, &payload).await?;
    tracing::info!(
        assignment_id = id,
        scheduled_checkout_date = ?updated.scheduled_checkout_date,
        "Checkout scheduled"
    );
    Ok(Json(updated))
}

/// POST /api/bed-requests/{id}/check-out
pub async fn check_out(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedCheckOut>,
) -> AppResult<Json<BedAssignment>> {
    load_in_scope(&state, &current_user, id).await?;

    let updated = bed_assignment::check_out(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

/// POST /api/bed-requests/{id}/deny
pub async fn deny(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BedDeny>,
) -> AppResult<Json<BedAssignment>> {
    load_in_scope(&state, &current_user, id).await?;
    let form = validate_deny(&payload)?;

    let updated = bed_assignment::deny(&state.pool, id, &form).await?;
    tracing::info!(assignment_id = id, denied_by = current_user.id(), "Bed request denied");
    Ok(Json(updated))
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn load(state: &ServerState, id: i64) -> AppResult<BedAssignment> {
    bed_assignment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BedRequestNotFound).with_detail("id", id))
}

async fn load_in_scope(
    state: &ServerState,
    current_user: &CurrentUser,
    id: i64,
) -> AppResult<BedAssignment> {
    let record = load(state, id).await?;
    current_user.ensure_in_scope(&record)?;
    Ok(record)
}

fn ensure_same_agency(case: &Case, site: &Site) -> AppResult<()> {
    if case.agency_id != site.agency_id {
        return Err(AppError::out_of_scope()
            .with_detail("case_id", case.id)
            .with_detail("site_id", site.id));
    }
    Ok(())
}
