//! Bearer token authentication middleware for the admin API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates requests carrying `ADMIN_TOKEN` as a Bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <ADMIN_TOKEN>
/// ```
///
/// # Errors
///
/// - `403 Forbidden` if no admin token is configured
/// - `401 Unauthorized` if the header is missing, malformed or carries the
///   wrong token. A `WWW-Authenticate: Bearer` header is added per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = api::routes::protected_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !st.auth_service.is_enabled() {
        return Err(AppError::forbidden(
            "Admin is disabled",
            json!({"reason": "ADMIN_TOKEN is not set"}),
        ));
    }

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    st.auth_service.verify_admin_token(&token).map_err(|_| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Invalid admin token"}))
    })?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
