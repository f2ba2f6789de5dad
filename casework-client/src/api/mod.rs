//! Endpoint wrappers, one module per resource
//!
//! Every wrapper checks the session's capabilities first and runs the
//! shared form validation before the request is issued.

pub mod bed_requests;
pub mod cases;
pub mod sites;
pub mod users;

use shared::bed::BedAction;
use shared::error::AppError;
use shared::models::BedAssignment;

use crate::ClientResult;

/// Local status-machine check, reported like the server's 409
pub(crate) fn ensure_transition(record: &BedAssignment, action: BedAction) -> ClientResult<()> {
    record
        .status
        .apply(action)
        .map(|_| ())
        .map_err(|e| AppError::from(e).into())
}

/// `?a=1&b=2` from the present pairs, values percent-encoded
pub(crate) fn query_string(pairs: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
