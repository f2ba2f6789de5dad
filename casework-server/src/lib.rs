//! Casework Server - case management REST API
//!
//! # Architecture
//!
//! - **Auth** (`auth`): JWT + Argon2, per-request [`CurrentUser`]
//! - **Database** (`db`): SQLite via sqlx, embedded migrations
//! - **HTTP API** (`api`): axum routers, one module per resource
//! - **Services** (`services`): background scheduled-checkout finalizer
//!
//! Permission checks and the bed status machine live in `shared` so the
//! client evaluates exactly the same rules.
//!
//! # Module layout
//!
//! ```text
//! casework-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── auth/          # JWT, password hashing, middleware, extractor
//! ├── db/            # pool setup and repositories
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # periodic work
//! └── utils/         # logging, time, input limits
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event log line on the `security` target
///
/// ```ignore
/// security_log!(WARN, "permission_denied", user_id = user.id, capability = %cap);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}
