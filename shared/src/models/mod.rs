//! Data models
//!
//! Shared between casework-server and casework-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix
//! milliseconds; calendar dates are `NaiveDate` (`yyyy-MM-dd` on the wire).

pub mod agency;
pub mod auth;
pub mod bed_assignment;
pub mod case;
pub mod records;
pub mod user;

// Re-exports
pub use agency::*;
pub use auth::*;
pub use bed_assignment::*;
pub use case::*;
pub use records::*;
pub use user::*;
