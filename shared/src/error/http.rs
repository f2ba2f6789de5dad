//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CaseNotFound
            | Self::BedRequestNotFound
            | Self::BedNotFound
            | Self::SiteNotFound
            | Self::UserNotFound
            | Self::AgencyNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::UsernameExists
            | Self::CaseHasActiveBed
            | Self::InvalidBedTransition
            | Self::BedNotAvailable => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleNotAssignable
            | Self::OutOfScope
            | Self::CannotModifyNetworkAdmin
            | Self::CannotDeactivateSelf => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::BedNotInSite
            | Self::CheckOutBeforeCheckIn
            | Self::LocationNotInAgency => StatusCode::BAD_REQUEST,
        }
    }
}
