//! `CurrentUser` extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use shared::error::AppError;

use crate::auth::{CurrentUser, authenticate};
use crate::core::ServerState;

/// Reuses the user resolved by [`crate::auth::require_auth`]; authenticates
/// on its own when the route sits outside the middleware
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user = authenticate(state, auth_header, &parts.uri).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
