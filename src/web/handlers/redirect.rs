//! Handler for short URL redirects.

use std::net::SocketAddr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;
use url::Url;

use crate::domain::click_event::ClickEvent;
use crate::state::AppState;
use crate::web::error::PageError;

/// Page that reports the click to analytics, then forwards the browser.
#[derive(Template, WebTemplate)]
#[template(path = "track_and_redirect.html")]
pub struct TrackAndRedirectTemplate {
    pub gtag_id: String,
    pub slug: String,
    pub target: String,
}

/// Redirects a slug to its target.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Resolve the slug (404 page if unknown, 410 page if expired)
/// 2. Queue a click event for the background worker
/// 3. Respond with `302 Found`, or with the tracking page when `GTAG_ID` is set
///
/// # Click Tracking
///
/// Click events go to a bounded channel. A full or closed queue drops the
/// click with a warning; the redirect still happens.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, PageError> {
    let link = state.link_service.resolve(&slug).await?;

    let click_event = ClickEvent::new(
        link.slug.clone(),
        Some(client_ip(&headers, addr, state.site.behind_proxy)),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.click_sender.try_send(click_event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("minishort_clicks_dropped_total").increment(1);
            warn!(slug = %event.slug, "Click queue full, click dropped");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("minishort_clicks_dropped_total").increment(1);
            warn!(slug = %event.slug, "Click queue closed, click dropped");
        }
    }

    metrics::counter!("minishort_redirects_total").increment(1);

    if let Some(gtag_id) = state.site.gtag_id.clone() {
        return Ok(TrackAndRedirectTemplate {
            gtag_id,
            slug: link.slug,
            target: link.target,
        }
        .into_response());
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, location(&link.target))]).into_response())
}

/// Header value for the target, percent-encoding it if it is not a valid
/// header value as typed.
fn location(target: &str) -> HeaderValue {
    HeaderValue::from_str(target)
        .ok()
        .or_else(|| {
            Url::parse(target)
                .ok()
                .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        })
        .unwrap_or_else(|| HeaderValue::from_static("/"))
}

/// Client address; the first `X-Forwarded-For` entry when behind a proxy.
fn client_ip(headers: &HeaderMap, addr: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy
        && let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    addr.ip().to_string()
}
