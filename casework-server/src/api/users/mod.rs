//! User administration routes
//!
//! Flag checks sit on the routes; the handlers add role and scope rules
//! (assignable roles, network administrators protected from agency
//! administrators).

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use shared::access::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_capability(Capability::ViewUsers)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(Capability::CreateUsers)));

    let role_routes = Router::new()
        .route("/{id}/role", put(handler::update_role))
        .layer(middleware::from_fn(require_capability(Capability::UpdateRoles)));

    let status_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_capability(
            Capability::UpdateUserStatus,
        )));

    read_routes
        .merge(create_routes)
        .merge(role_routes)
        .merge(status_routes)
}
