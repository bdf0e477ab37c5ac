//! DTOs for the admin link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Link, LinkSummary};
use crate::utils::base_url::short_url;
use crate::utils::slug::SLUG_REGEX;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (HTTP or HTTPS).
    #[validate(length(min = 1, max = 2048, message = "Target must be 1-2048 characters"))]
    pub target: String,

    /// Optional custom slug.
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "Custom slug must be 3–64 characters of letters, numbers, underscore, or hyphen."
    ))]
    pub slug: Option<String>,

    /// Optional expiry. After this time the link returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/links/{slug}`.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "Target must be 1-2048 characters"))]
    pub target: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Query parameters for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct LinkListQuery {
    /// Case-insensitive substring filter.
    #[serde(default)]
    pub q: String,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub slug: String,
    pub target: String,
    pub short_url: String,
    pub manage_url: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub clicks: u64,
    pub last_access: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Builds the response, deriving short and manage URLs from `base_url`.
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = short_url(base_url, &link.slug);
        let manage_url = format!(
            "{}/manage/{}?key={}",
            base_url.trim_end_matches('/'),
            link.slug,
            link.secret
        );
        let expired = link.is_expired();

        Self {
            short_url,
            manage_url,
            expired,
            slug: link.slug,
            target: link.target,
            secret: link.secret,
            created_at: link.created_at,
            expires_at: link.expires_at,
            clicks: link.clicks,
            last_access: link.last_access,
        }
    }
}

/// Link counts.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

impl From<LinkSummary> for SummaryResponse {
    fn from(summary: LinkSummary) -> Self {
        Self {
            total: summary.total,
            active: summary.active,
            expired: summary.expired,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub summary: SummaryResponse,
    pub items: Vec<LinkResponse>,
}
