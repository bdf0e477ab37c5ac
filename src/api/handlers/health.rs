//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthResponse};
use crate::state::AppState;

/// Returns service health and the number of stored links.
///
/// # Endpoint
///
/// `GET /healthz`
///
/// # Response Codes
///
/// - **200 OK**: store readable and click queue open
/// - **503 Service Unavailable**: store unreadable or click queue closed
///
/// # Response
///
/// ```json
/// {
///   "ok": true,
///   "count": 42,
///   "version": "0.1.0",
///   "click_queue": { "status": "ok", "message": "Capacity: 10000" }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let count = state.link_service.count().await;
    let queue_check = check_click_queue(&state);

    let ok = count.is_ok() && queue_check.status == "ok";

    let response = HealthResponse {
        ok,
        count: count.unwrap_or_default(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        click_queue: queue_check,
    };

    if ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks if the click tracking queue is operational.
fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Click queue is closed".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Capacity: {}", state.click_sender.capacity())),
        }
    }
}
