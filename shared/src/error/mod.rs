//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes grouped by domain
//! - [`ErrorCategory`]: classification of codes by range
//! - [`AppError`]: code + message + optional field details
//! - [`ApiResponse`]: the JSON envelope of failed API calls
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Case errors
//! - 4xxx: Bed workflow errors
//! - 8xxx: User and agency errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("Bed is required").with_detail("bed_id", "Bed is required");
//! let body = ApiResponse::from(&err);
//! assert_eq!(body.code, 2);
//! assert_eq!(body.into_error().code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
