//! Web route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    admin_delete_handler, admin_handler, admin_impersonate_handler, admin_login_handler,
    admin_logout_handler, create_handler, index_handler, manage_edit_handler,
    manage_post_handler, manage_select_handler, redirect_handler,
};
use crate::web::middleware::admin_session;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Public pages.
///
/// # Endpoints
///
/// - `GET  /` - Home page with the create form
/// - `GET  /manage` - Slug + key prompt
/// - `GET  /manage/{slug}` - Edit form (`?key=` required)
/// - `POST /manage/{slug}` - Update or delete (`?key=` required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/manage", get(manage_select_handler))
        .route(
            "/manage/{slug}",
            get(manage_edit_handler).post(manage_post_handler),
        )
}

/// Form posts that write to the store.
///
/// # Endpoints
///
/// - `POST /create` - Create a link
pub fn form_routes() -> Router<AppState> {
    Router::new().route("/create", post(create_handler))
}

/// Short link redirects.
///
/// # Endpoints
///
/// - `GET /{slug}` - Redirect or tracking page
pub fn redirect_routes() -> Router<AppState> {
    Router::new().route("/{slug}", get(redirect_handler))
}

/// Admin pages.
///
/// Protected via [`admin_session::layer`] except sign-in and sign-out.
///
/// # Endpoints
///
/// - `GET  /admin` - List and search
/// - `POST /admin/delete/{slug}` - Delete a link
/// - `GET  /admin/impersonate/{slug}` - Open a link's manage page
/// - `POST /admin/login` - Sign in with the admin token
/// - `GET  /admin/logout` - Sign out
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin", get(admin_handler))
        .route("/admin/delete/{slug}", post(admin_delete_handler))
        .route("/admin/impersonate/{slug}", get(admin_impersonate_handler))
        .route_layer(middleware::from_fn_with_state(state, admin_session::layer));

    Router::new()
        .merge(protected)
        .route("/admin/login", post(admin_login_handler))
        .route("/admin/logout", get(admin_logout_handler))
}
