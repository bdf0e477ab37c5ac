//! Admin pages: search, delete, impersonate, sign in and out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::error::PageError;
use crate::web::forms::{AdminQuery, LoginForm};
use crate::web::middleware::admin_session::{
    is_secure, login_page, session_clear_cookie, session_set_cookie,
};
use crate::web::notice::{Notice, manage_location, with_notice};

/// One row of the admin table.
pub struct AdminRow {
    pub slug: String,
    pub target: String,
    pub created_at: String,
    pub expires_at: String,
    pub expired: bool,
    pub clicks: u64,
    pub last_access: String,
}

impl AdminRow {
    fn from_link(link: Link, now: chrono::DateTime<Utc>) -> Self {
        let fmt = |t: chrono::DateTime<Utc>| t.format("%Y-%m-%d %H:%M").to_string();

        Self {
            expired: link.is_expired_at(now),
            created_at: fmt(link.created_at),
            expires_at: link.expires_at.map(fmt).unwrap_or_else(|| "never".to_string()),
            last_access: link.last_access.map(fmt).unwrap_or_else(|| "-".to_string()),
            clicks: link.clicks,
            slug: link.slug,
            target: link.target,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub notice: Option<Notice>,
    pub q: String,
    pub items: Vec<AdminRow>,
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

/// Lists and searches links.
///
/// # Endpoint
///
/// `GET /admin?q=<filter>`
///
/// Requires an admin session, see
/// [`crate::web::middleware::admin_session`].
pub async fn admin_handler(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, PageError> {
    let q = query.q.trim().to_lowercase();
    let summary = state.link_service.summary().await?;
    let now = Utc::now();

    let items = state
        .link_service
        .search(&q)
        .await?
        .into_iter()
        .map(|link| AdminRow::from_link(link, now))
        .collect();

    let notice = query
        .notice
        .as_deref()
        .and_then(|code| Notice::from_code(code, query.slug.as_deref()));

    Ok(AdminTemplate {
        notice,
        q,
        items,
        total: summary.total,
        active: summary.active,
        expired: summary.expired,
    })
}

/// Starts an admin session from the login form.
///
/// # Endpoint
///
/// `POST /admin/login`
///
/// A valid token sets the session cookie and redirects to `/admin`; an
/// invalid one re-renders the login form with 403.
pub async fn admin_login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if let Err(err) = state.auth_service.verify_admin_token(form.token.trim()) {
        if !state.auth_service.is_enabled() {
            return Err(err.into());
        }
        tracing::warn!("Rejected admin login");
        return Ok(login_page(Some("Invalid admin token.")));
    }

    let cookie = session_set_cookie(&state.auth_service, is_secure(&state)).map_err(|e| {
        AppError::internal(
            "Failed to build session cookie",
            serde_json::json!({ "reason": e.to_string() }),
        )
    })?;

    tracing::info!("Admin signed in");

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/admin")).into_response())
}

/// Ends the admin session.
///
/// # Endpoint
///
/// `GET /admin/logout`
pub async fn admin_logout_handler() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, session_clear_cookie())],
        Redirect::to(&with_notice("/", &Notice::LoggedOut)),
    )
}

/// Deletes a link without its secret key.
///
/// # Endpoint
///
/// `POST /admin/delete/{slug}`
pub async fn admin_delete_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, PageError> {
    let notice = match state.link_service.admin_delete(&slug).await {
        Ok(()) => Notice::AdminDeleted(slug),
        Err(AppError::NotFound { .. }) => Notice::NoSuchSlug,
        Err(err) => return Err(err.into()),
    };

    Ok(Redirect::to(&with_notice("/admin", &notice)))
}

/// Opens the manage page of a link using its secret key.
///
/// # Endpoint
///
/// `GET /admin/impersonate/{slug}`
pub async fn admin_impersonate_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, PageError> {
    match state.link_service.get(&slug).await {
        Ok(link) => Ok(Redirect::to(&manage_location(&link.slug, &link.secret, None))),
        Err(AppError::NotFound { .. }) => Ok(Redirect::to(&with_notice(
            "/admin",
            &Notice::NoSuchSlug,
        ))),
        Err(err) => Err(err.into()),
    }
}

