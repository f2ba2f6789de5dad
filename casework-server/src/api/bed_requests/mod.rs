//! Bed Request Routes
//!
//! | Path | Method | Flag |
//! |------|--------|------|
//! | /api/bed-requests | GET | can_view_bed_requests |
//! | /api/bed-requests | POST | can_create_bed_request |
//! | /api/bed-requests/assign | POST | can_assign_bed |
//! | /api/bed-requests/{id} | GET | can_view_bed_requests |
//! | /api/bed-requests/{id} | PUT, DELETE | can_view_bed_requests |
//! | /api/bed-requests/{id}/check-in | POST | can_check_in_bed |
//! | /api/bed-requests/{id}/check-in | PUT | can_view_bed_requests |
//! | /api/bed-requests/{id}/schedule-checkout | POST | can_check_out_bed |
//! | /api/bed-requests/{id}/check-out | POST | can_check_out_bed |
//! | /api/bed-requests/{id}/deny | POST | can_deny_bed_request |
//!
//! Edit and delete routes are further gated per record by
//! `can_edit_bed_request` / `can_delete_bed_request` in the handlers.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use shared::access::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bed-requests", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/check-in", axum::routing::put(handler::edit_check_in))
        .layer(middleware::from_fn(require_capability(
            Capability::ViewBedRequests,
        )));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(
            Capability::CreateBedRequest,
        )));

    let assign_routes = Router::new()
        .route("/assign", post(handler::assign))
        .layer(middleware::from_fn(require_capability(Capability::AssignBed)));

    let check_in_routes = Router::new()
        .route("/{id}/check-in", post(handler::check_in))
        .layer(middleware::from_fn(require_capability(Capability::CheckInBed)));

    let check_out_routes = Router::new()
        .route("/{id}/schedule-checkout", post(handler::schedule_checkout))
        .route("/{id}/check-out", post(handler::check_out))
        .layer(middleware::from_fn(require_capability(Capability::CheckOutBed)));

    let deny_routes = Router::new()
        .route("/{id}/deny", post(handler::deny))
        .layer(middleware::from_fn(require_capability(
            Capability::DenyBedRequest,
        )));

    read_routes
        .merge(create_routes)
        .merge(assign_routes)
        .merge(check_in_routes)
        .merge(check_out_routes)
        .merge(deny_routes)
}
