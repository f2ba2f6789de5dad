//! Site and Bed Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::error::AppResult;
use shared::models::{Bed, BedCreate, Site, SiteCreate};

use crate::api::{ensure_location_of, load_site, owning_agency};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::site;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

/// POST /api/sites
pub async fn create_site(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<SiteCreate>,
) -> AppResult<Json<Site>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    let agency = owning_agency(&state, &current_user, payload.agency_id).await?;
    if let Some(location_id) = payload.location_id {
        ensure_location_of(&state, agency.id, location_id).await?;
    }

    let created = site::create_site(&state.pool, agency.id, &payload).await?;
    tracing::info!(site_id = created.id, agency_id = created.agency_id, "Site created");
    Ok(Json(created))
}

/// POST /api/sites/{id}/beds
pub async fn create_bed(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(site_id): Path<i64>,
    Json(payload): Json<BedCreate>,
) -> AppResult<Json<Bed>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.room_name, "room_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.bed_type, "bed_type", MAX_NAME_LEN)?;
    let site = load_site(&state, &current_user, site_id).await?;

    let created = site::create_bed(&state.pool, site.id, &payload).await?;
    tracing::info!(bed_id = created.id, site_id = site.id, "Bed created");
    Ok(Json(created))
}

/// GET /api/sites/{id}/available-beds
pub async fn available_beds(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(site_id): Path<i64>,
) -> AppResult<Json<Vec<Bed>>> {
    let site = load_site(&state, &current_user, site_id).await?;
    Ok(Json(site::available_beds(&state.pool, site.id).await?))
}
