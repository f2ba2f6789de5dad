//! Agency Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::SiteBedSummary;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{agency, site};

/// GET /api/agencies/{id}/bed-summary
///
/// Per-site totals. Users bound to a location see that location's sites
/// and the agency-wide ones.
pub async fn bed_summary(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(agency_id): Path<i64>,
) -> AppResult<Json<Vec<SiteBedSummary>>> {
    let network_wide = current_user.capabilities.flags.can_manage_agencies;
    if !network_wide && agency_id != current_user.company_id() {
        return Err(AppError::out_of_scope().with_detail("agency_id", agency_id));
    }

    agency::find_by_id(&state.pool, agency_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AgencyNotFound).with_detail("agency_id", agency_id))?;

    let location_id = if network_wide {
        None
    } else {
        current_user.active_location()
    };
    Ok(Json(site::bed_summary(&state.pool, agency_id, location_id).await?))
}
