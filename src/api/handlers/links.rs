//! Handlers for the admin link API (list, create, read, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkListQuery, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::application::services::CreateLink;
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::public_base_url;

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    public_base_url(
        state.site.base_url.as_deref(),
        headers,
        state.site.behind_proxy,
    )
}

/// Lists links newest first with overall counts.
///
/// # Endpoint
///
/// `GET /api/links?q=<filter>`
///
/// `q` filters by a case-insensitive substring of slug, target or creation
/// time. Counts in `summary` always cover the whole store.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkListQuery>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let base = base_url(&state, &headers);

    let summary = state.link_service.summary().await?;
    let items = state
        .link_service
        .search(&query.q)
        .await?
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &base))
        .collect();

    Ok(Json(LinkListResponse {
        summary: summary.into(),
        items,
    }))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "target": "https://example.com",
///   "slug": "my-link",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// `slug` and `expires_at` are optional.
///
/// # Errors
///
/// - 400 Bad Request for an invalid target or slug
/// - 409 Conflict if the slug is taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(CreateLink {
            target: payload.target,
            slug: payload.slug,
            expires_at: payload.expires_at,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &base_url(&state, &headers))),
    ))
}

/// Returns one link, expired or not.
///
/// # Endpoint
///
/// `GET /api/links/{slug}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(&slug).await?;

    Ok(Json(LinkResponse::from_link(link, &base_url(&state, &headers))))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{slug}`
///
/// # Request Body
///
/// ```json
/// { "target": "https://new.example.com", "expires_at": null }
/// ```
///
/// Omitted fields are unchanged; `"expires_at": null` removes the expiry.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .admin_update(
            &slug,
            LinkPatch {
                target: payload.target,
                expires_at: payload.expires_at,
            },
        )
        .await?;

    Ok(Json(LinkResponse::from_link(link, &base_url(&state, &headers))))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{slug}`
///
/// Returns 204 No Content, or 404 if the slug does not exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.admin_delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
