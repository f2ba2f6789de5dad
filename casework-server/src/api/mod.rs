//! HTTP API
//!
//! One module per resource, each exposing `router()`. Every `/api/` route
//! except login sits behind [`require_auth`]; mutating routes add a
//! [`crate::auth::require_capability`] layer, and handlers apply the
//! record-level predicates.
//!
//! - [`health`] - liveness
//! - [`auth`] - login, current user, location switch
//! - [`users`] - user administration
//! - [`cases`] - cases and their current bed
//! - [`sites`] - sites, beds, availability
//! - [`agencies`] - per-agency bed summary
//! - [`bed_requests`] - bed workflow

pub mod agencies;
pub mod auth;
pub mod bed_requests;
pub mod cases;
pub mod health;
pub mod sites;
pub mod users;

use axum::Router;
use axum::middleware;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Agency, Case, Site};

use crate::auth::{CurrentUser, require_auth};
use crate::core::ServerState;
use crate::db::repository::{agency, case, site};

/// All routes, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(cases::router())
        .merge(sites::router())
        .merge(agencies::router())
        .merge(bed_requests::router())
}

/// Routes plus tracing, CORS and authentication
///
/// Used by the HTTP server and by router tests. Authentication is the
/// innermost app-wide layer, so rejected requests are still traced and
/// carry CORS headers.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
    )
}

// ── Scoped loaders shared by handlers ───────────────────────────────

/// Case by id, rejected when outside the acting user's scope
pub(crate) async fn load_case(
    state: &ServerState,
    current_user: &CurrentUser,
    id: i64,
) -> AppResult<Case> {
    let case = case::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CaseNotFound).with_detail("id", id))?;
    current_user.ensure_in_scope(&case)?;
    Ok(case)
}

/// Site by id, rejected when outside the acting user's scope
pub(crate) async fn load_site(
    state: &ServerState,
    current_user: &CurrentUser,
    id: i64,
) -> AppResult<Site> {
    let site = site::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SiteNotFound).with_detail("site_id", id))?;
    current_user.ensure_in_scope(&site)?;
    Ok(site)
}

/// Agency a new record is created under
///
/// Defaults to the actor's own agency; naming another one requires
/// `can_manage_agencies`.
pub(crate) async fn owning_agency(
    state: &ServerState,
    current_user: &CurrentUser,
    requested: Option<i64>,
) -> AppResult<Agency> {
    let agency_id = requested.unwrap_or(current_user.company_id());
    if agency_id != current_user.company_id() && !current_user.capabilities.flags.can_manage_agencies
    {
        return Err(AppError::out_of_scope().with_detail("agency_id", agency_id));
    }
    agency::find_by_id(&state.pool, agency_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AgencyNotFound).with_detail("agency_id", agency_id))
}

/// `location_id` must be a location (sub-agency) of `company_id`
pub(crate) async fn ensure_location_of(
    state: &ServerState,
    company_id: i64,
    location_id: i64,
) -> AppResult<()> {
    let location = agency::find_by_id(&state.pool, location_id).await?;
    if location.and_then(|l| l.parent_id) != Some(company_id) {
        return Err(
            AppError::new(ErrorCode::LocationNotInAgency).with_detail("location_id", location_id)
        );
    }
    Ok(())
}
