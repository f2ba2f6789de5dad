//! Agency Routes

mod handler;

use axum::{Router, middleware, routing::get};

use shared::access::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/agencies/{id}/bed-summary", get(handler::bed_summary))
        .layer(middleware::from_fn(require_capability(
            Capability::ViewBedRequests,
        )))
}
