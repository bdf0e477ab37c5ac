//! Top-level router configuration combining web and API routes.
//!
//! # Route Structure
//!
//! - `GET  /`, `/manage/*`  - Public pages
//! - `POST /create`         - Create a link from the home page form
//! - `GET  /{slug}`         - Short link redirect
//! - `GET  /healthz`        - Health check
//! - `/admin/*`             - Admin pages (session cookie required)
//! - `/api/*`               - Admin JSON API (Bearer `ADMIN_TOKEN` required)
//! - `/static/*`            - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token (API) or cookie session (admin pages)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, Limits};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::error::not_found_handler;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = rate_limit::apply(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        Limits::SECURE,
        behind_proxy,
    );

    let admin_router = rate_limit::apply(
        web::routes::admin_routes(state.clone()),
        Limits::SECURE,
        behind_proxy,
    );

    let form_router = rate_limit::apply(web::routes::form_routes(), Limits::SECURE, behind_proxy);

    let public_router = rate_limit::apply(
        web::routes::public_routes()
            .merge(web::routes::redirect_routes())
            .route("/healthz", get(health_handler)),
        Limits::PUBLIC,
        behind_proxy,
    );

    let router = Router::new()
        .merge(public_router)
        .merge(form_router)
        .merge(admin_router)
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
