//! API route configuration.
//!
//! All API endpoints require `Authorization: Bearer <ADMIN_TOKEN>` via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /links`        - List and search links with counts
/// - `POST   /links`        - Create a link
/// - `GET    /links/{slug}` - Fetch one link
/// - `PATCH  /links/{slug}` - Partially update a link
/// - `DELETE /links/{slug}` - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{slug}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
}
