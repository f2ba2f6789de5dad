//! Authentication and capability middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use shared::access::Capability;
use shared::error::AppError;

use crate::auth::{CurrentUser, authenticate};
use crate::core::ServerState;

/// Require a valid bearer token on every `/api/` route
///
/// Skipped for CORS preflight, non-API paths and `/api/auth/login`. On
/// success the [`CurrentUser`] is stored in the request extensions.
///
/// | Failure | Code |
/// |---------|------|
/// | no Authorization header | NotAuthenticated |
/// | expired token | TokenExpired |
/// | bad token or unknown user | TokenInvalid |
/// | deactivated user | AccountDisabled |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") || path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    // Owned copies: the request body is not Sync, so no borrow may cross the await
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);
    let uri = req.uri().clone();

    let user = authenticate(&state, auth_header.as_deref(), &uri).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require one capability flag
///
/// ```ignore
/// Router::new()
///     .route("/api/sites", post(handler::create_site))
///     .layer(middleware::from_fn(require_capability(Capability::ManageBeds)));
/// ```
pub fn require_capability(
    capability: Capability,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            user.require(capability)?;

            Ok(next.run(req).await)
        })
    }
}
