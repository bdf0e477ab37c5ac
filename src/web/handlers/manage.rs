//! Manage pages: edit or delete a link with its secret key.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};

use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::{public_base_url, short_url};
use crate::utils::expiry::split_for_form;
use crate::web::error::PageError;
use crate::web::forms::{ManageForm, ManageQuery};
use crate::web::notice::{Notice, manage_location, with_notice};

#[derive(Template, WebTemplate)]
#[template(path = "manage_select.html")]
pub struct ManageSelectTemplate {
    pub slug: String,
    pub key: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "manage_edit.html")]
pub struct ManageEditTemplate {
    pub notice: Option<Notice>,
    pub slug: String,
    pub key: String,
    pub full_url: String,
    pub target: String,
    pub expires_date: String,
    pub expires_time: String,
    pub never_expires: bool,
    pub expired: bool,
    pub clicks: u64,
    pub created_at: String,
    pub last_access: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Asks for a slug and secret key.
///
/// # Endpoint
///
/// `GET /manage?slug=&key=`
///
/// When both are given the browser is sent on to `/manage/{slug}?key=`.
pub async fn manage_select_handler(Query(query): Query<ManageQuery>) -> Response {
    match (non_empty(query.slug), non_empty(query.key)) {
        (Some(slug), Some(key)) => Redirect::to(&manage_location(&slug, &key, None)).into_response(),
        (slug, key) => ManageSelectTemplate {
            slug: slug.unwrap_or_default(),
            key: key.unwrap_or_default(),
        }
        .into_response(),
    }
}

/// Shows the edit form for a link.
///
/// # Endpoint
///
/// `GET /manage/{slug}?key=<secret>`
///
/// # Errors
///
/// - 404 page for an unknown slug
/// - 403 page for a wrong key
pub async fn manage_edit_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ManageQuery>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let Some(key) = non_empty(query.key) else {
        return Ok(ManageSelectTemplate {
            slug,
            key: String::new(),
        }
        .into_response());
    };

    let link = state.link_service.authorize(&slug, &key).await?;

    let base = public_base_url(
        state.site.base_url.as_deref(),
        &headers,
        state.site.behind_proxy,
    );
    let (expires_date, expires_time) = split_for_form(link.expires_at);
    let notice = query
        .notice
        .as_deref()
        .and_then(|code| Notice::from_code(code, None));

    Ok(ManageEditTemplate {
        notice,
        full_url: short_url(&base, &link.slug),
        never_expires: link.expires_at.is_none(),
        expired: link.is_expired(),
        expires_date,
        expires_time,
        clicks: link.clicks,
        created_at: link.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        last_access: link
            .last_access
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string()),
        target: link.target,
        slug: link.slug,
        key,
    }
    .into_response())
}

/// Applies an edit or deletes the link.
///
/// # Endpoint
///
/// `POST /manage/{slug}?key=<secret>`
///
/// - `action=delete` deletes and redirects to `/?notice=deleted`
/// - otherwise updates target and expiry and redirects back to the edit
///   form. A blank target keeps the current one.
///
/// Unparsable expiry or a bad target redirect back with an error notice and
/// leave the link unchanged.
pub async fn manage_post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ManageQuery>,
    Form(form): Form<ManageForm>,
) -> Result<Response, PageError> {
    let key = non_empty(query.key).unwrap_or_default();
    state.link_service.authorize(&slug, &key).await?;

    if form.is_delete() {
        state.link_service.delete_link(&slug, &key).await?;
        return Ok(Redirect::to(&with_notice("/", &Notice::Deleted)).into_response());
    }

    let back = |notice: Notice| Redirect::to(&manage_location(&slug, &key, Some(&notice)));

    let Ok(expires_at) = form.expiry() else {
        return Ok(back(Notice::BadExpiry).into_response());
    };

    let patch = LinkPatch {
        target: form.new_target(),
        expires_at: Some(expires_at),
    };

    match state.link_service.update_link(&slug, &key, patch).await {
        Ok(_) => Ok(back(Notice::Saved).into_response()),
        Err(AppError::Validation { .. }) => Ok(back(Notice::BadTarget).into_response()),
        Err(err) => Err(err.into()),
    }
}
