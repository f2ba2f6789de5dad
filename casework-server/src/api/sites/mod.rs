//! Site and Bed Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use shared::access::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sites", routes())
}

fn routes() -> Router<ServerState> {
    let manage_routes = Router::new()
        .route("/", post(handler::create_site))
        .route("/{id}/beds", post(handler::create_bed))
        .layer(middleware::from_fn(require_capability(Capability::ManageBeds)));

    let read_routes = Router::new()
        .route("/{id}/available-beds", get(handler::available_beds))
        .layer(middleware::from_fn(require_capability(
            Capability::ViewBedRequests,
        )));

    manage_routes.merge(read_routes)
}
