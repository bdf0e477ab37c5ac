//! Public base URL resolution for building short links.

use axum::http::{HeaderMap, header};

/// Returns the base URL short links are built on.
///
/// A configured `BASE_URL` wins. Otherwise the base is derived from the
/// request's `Host` header, using `X-Forwarded-Proto` for the scheme when
/// the service runs behind a trusted proxy.
///
/// The result never ends with a slash.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt:8080".parse().unwrap());
///
/// assert_eq!(public_base_url(None, &headers, false), "http://sho.rt:8080");
/// assert_eq!(public_base_url(Some("https://s.io/"), &headers, false), "https://s.io");
/// ```
pub fn public_base_url(configured: Option<&str>, headers: &HeaderMap, behind_proxy: bool) -> String {
    if let Some(base) = configured {
        return base.trim_end_matches('/').to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");

    let scheme = if behind_proxy {
        headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim())
            .filter(|v| *v == "http" || *v == "https")
            .unwrap_or("http")
    } else {
        "http"
    };

    format!("{}://{}", scheme, host.trim_end_matches('/'))
}

/// Joins a base URL and a slug into a full short URL.
pub fn short_url(base: &str, slug: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), slug)
}
