//! Casework Client - typed HTTP client for the casework server
//!
//! [`CaseworkClient`] wraps every REST endpoint. It owns an explicit
//! [`Session`] and runs the same capability resolver and form validation
//! as the server before a request leaves the process. Those local checks
//! are advisory: the server re-checks everything.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use client::CaseworkClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::Session;

// Re-export shared types for convenience
pub use shared::models::{
    BedAssignment, CurrentBedAssignment, LoginResponse, MeResponse, SiteBedSummary, User,
};
