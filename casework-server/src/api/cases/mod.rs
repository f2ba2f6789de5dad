//! Case Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use shared::access::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cases", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_capability(Capability::ViewCases)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(Capability::CreateCases)));

    let bed_routes = Router::new()
        .route("/{id}/current-bed", get(handler::current_bed))
        .layer(middleware::from_fn(require_capability(
            Capability::ViewBedRequests,
        )));

    read_routes.merge(create_routes).merge(bed_routes)
}
