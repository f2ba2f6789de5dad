//! Shared types for the Casework workspace
//!
//! Domain types used by both `casework-server` and `casework-client`:
//! roles and the capability resolver, the bed workflow status machine,
//! form validation, data models and the unified error system.
//!
//! Nothing in this crate performs I/O.

pub mod access;
pub mod bed;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use access::{Capabilities, Capability, CapabilitySummary, Principal, Role};
pub use bed::{BedAction, BedStatus};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
