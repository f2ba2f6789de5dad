//! Case Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::error::AppResult;
use shared::models::{Case, CaseCreate, CurrentBedAssignment};

use crate::api::{ensure_location_of, load_case, owning_agency};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{bed_assignment, case};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// POST /api/cases
///
/// The case joins the acting user's agency (or, for network administrators,
/// the named one). Within the actor's own agency it also defaults to their
/// active location.
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CaseCreate>,
) -> AppResult<Json<Case>> {
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;

    let agency = owning_agency(&state, &current_user, payload.agency_id).await?;
    let location_id = if agency.id == current_user.company_id() {
        payload.location_id.or(current_user.active_location())
    } else {
        payload.location_id
    };
    if let Some(location_id) = location_id {
        ensure_location_of(&state, agency.id, location_id).await?;
    }
    let payload = CaseCreate {
        location_id,
        ..payload
    };

    let created = case::create(
        &state.pool,
        agency.id,
        current_user.id(),
        &payload,
    )
    .await?;
    tracing::info!(case_id = created.id, created_by = current_user.id(), "Case created");
    Ok(Json(created))
}

/// GET /api/cases/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Case>> {
    Ok(Json(load_case(&state, &current_user, id).await?))
}

/// GET /api/cases/{id}/current-bed
pub async fn current_bed(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<CurrentBedAssignment>> {
    let case = load_case(&state, &current_user, id).await?;
    let active = bed_assignment::find_active_for_case(&state.pool, case.id).await?;
    Ok(Json(CurrentBedAssignment::new(case.id, active)))
}
