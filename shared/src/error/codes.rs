//! Error codes shared by the casework server and client
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Case errors
//! - 4xxx: Bed workflow errors
//! - 8xxx: User and agency errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every failed API response
///
/// Serialized as a bare `u16` so the client can match on it without
/// knowing the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Not authenticated
    NotAuthenticated = 1001,
    /// Invalid username or password
    InvalidCredentials = 1002,
    /// Token expired
    TokenExpired = 1003,
    /// Token invalid
    TokenInvalid = 1004,
    /// Account disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Role cannot be assigned by the acting user
    RoleNotAssignable = 2002,
    /// Target outside the acting user's agency or location
    OutOfScope = 2003,
    /// Network administrators cannot be modified by agency administrators
    CannotModifyNetworkAdmin = 2004,

    // ==================== 3xxx: Case ====================
    /// Case not found
    CaseNotFound = 3001,
    /// Case already holds an active bed
    CaseHasActiveBed = 3002,

    // ==================== 4xxx: Bed workflow ====================
    /// Bed request not found
    BedRequestNotFound = 4001,
    /// Action not allowed from the current bed status
    InvalidBedTransition = 4002,
    /// Bed is occupied
    BedNotAvailable = 4003,
    /// Bed belongs to another site
    BedNotInSite = 4004,
    /// Bed not found
    BedNotFound = 4005,
    /// Site not found
    SiteNotFound = 4006,
    /// Check-out date precedes check-in date
    CheckOutBeforeCheckIn = 4007,

    // ==================== 8xxx: User / Agency ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,
    /// Agency not found
    AgencyNotFound = 8003,
    /// Location does not belong to the user's agency
    LocationNotInAgency = 8004,
    /// Users cannot deactivate themselves
    CannotDeactivateSelf = 8005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::AccountDisabled => "Account has been disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleNotAssignable => "You are not allowed to assign this role",
            ErrorCode::OutOfScope => "Record is outside your agency or location",
            ErrorCode::CannotModifyNetworkAdmin => "Network administrators cannot be modified",

            // Case
            ErrorCode::CaseNotFound => "Case not found",
            ErrorCode::CaseHasActiveBed => "Case already has an active bed assignment",

            // Bed workflow
            ErrorCode::BedRequestNotFound => "Bed request not found",
            ErrorCode::InvalidBedTransition => "Action is not allowed in the current bed status",
            ErrorCode::BedNotAvailable => "Bed is not available",
            ErrorCode::BedNotInSite => "Bed does not belong to the selected site",
            ErrorCode::BedNotFound => "Bed not found",
            ErrorCode::SiteNotFound => "Site not found",
            ErrorCode::CheckOutBeforeCheckIn => "Check-out date cannot be before check-in date",

            // User / Agency
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::AgencyNotFound => "Agency not found",
            ErrorCode::LocationNotInAgency => "Location does not belong to your agency",
            ErrorCode::CannotDeactivateSelf => "You cannot change your own status",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an unknown u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleNotAssignable),
            2003 => Ok(ErrorCode::OutOfScope),
            2004 => Ok(ErrorCode::CannotModifyNetworkAdmin),

            // Case
            3001 => Ok(ErrorCode::CaseNotFound),
            3002 => Ok(ErrorCode::CaseHasActiveBed),

            // Bed workflow
            4001 => Ok(ErrorCode::BedRequestNotFound),
            4002 => Ok(ErrorCode::InvalidBedTransition),
            4003 => Ok(ErrorCode::BedNotAvailable),
            4004 => Ok(ErrorCode::BedNotInSite),
            4005 => Ok(ErrorCode::BedNotFound),
            4006 => Ok(ErrorCode::SiteNotFound),
            4007 => Ok(ErrorCode::CheckOutBeforeCheckIn),

            // User / Agency
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),
            8003 => Ok(ErrorCode::AgencyNotFound),
            8004 => Ok(ErrorCode::LocationNotInAgency),
            8005 => Ok(ErrorCode::CannotDeactivateSelf),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
