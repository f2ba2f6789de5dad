//! Client error types

use std::collections::HashMap;

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Shown when a failed response carries no usable message
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server (or local validation) rejected the request
    #[error("{message}")]
    Api {
        code: u16,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// A client-side guard stopped the call before it was issued
    #[error("{0}")]
    Blocked(String),

    /// The local capability check failed
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// No session; log in first
    #[error("Not logged in")]
    NotLoggedIn,

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Build an API error from a failure body
    ///
    /// Bodies that are not the error envelope, or carry an empty message,
    /// fall back to [`FALLBACK_MESSAGE`].
    pub fn from_body(body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            code: Option<u16>,
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            details: Option<HashMap<String, Value>>,
        }

        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let (code, message, details) = match parsed {
            Some(b) => (b.code, b.message, b.details),
            None => (None, None, None),
        };
        ClientError::Api {
            code: code.unwrap_or(ErrorCode::Unknown.code()),
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            details,
        }
    }

    /// Typed error code, when this is an API error with a known code
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => ErrorCode::try_from(*code).ok(),
            _ => None,
        }
    }

    /// Field-level message for `field`, if the error carries one
    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            ClientError::Api {
                details: Some(details),
                ..
            } => details.get(field).and_then(Value::as_str),
            _ => None,
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Api {
            code: err.code.code(),
            message: err.message,
            details: err.details,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
