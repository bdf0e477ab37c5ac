//! HTML rendering of [`AppError`] for browser-facing routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

#[derive(Template, WebTemplate)]
#[template(path = "notfound.html")]
pub struct NotFoundTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "gone.html")]
pub struct GoneTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "forbidden.html")]
pub struct ForbiddenTemplate {
    pub message: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

/// Error returned by web handlers; renders an error page instead of JSON.
///
/// | error | status | page |
/// |---|---|---|
/// | `NotFound` | 404 | `notfound.html` |
/// | `Gone` | 410 | `gone.html` |
/// | `Forbidden`, `Unauthorized` | 403 | `forbidden.html` |
/// | others | error status | `error.html` |
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, NotFoundTemplate {}).into_response()
            }
            AppError::Gone { .. } => (StatusCode::GONE, GoneTemplate {}).into_response(),
            AppError::Forbidden { message, .. } | AppError::Unauthorized { message, .. } => (
                StatusCode::FORBIDDEN,
                ForbiddenTemplate { message },
            )
                .into_response(),
            err @ AppError::Internal { .. } => {
                tracing::error!(error = %err, details = %err.to_error_info().details, "Page failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorTemplate {
                        message: "Something went wrong. Please try again.".to_string(),
                    },
                )
                    .into_response()
            }
            err => {
                let status = err.status();
                (
                    status,
                    ErrorTemplate {
                        message: err.to_string(),
                    },
                )
                    .into_response()
            }
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate {})
}
