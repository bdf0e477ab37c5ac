//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short link with its management secret and click statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub slug: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    /// `None` means the link never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Per-link key required to edit or delete the link.
    pub secret: String,
    pub clicks: u64,
    pub last_access: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `query` (already lowercased) appears in the slug,
    /// target or creation timestamp.
    pub fn matches(&self, query: &str) -> bool {
        self.slug.to_lowercase().contains(query)
            || self.target.to_lowercase().contains(query)
            || self.created_at.to_rfc3339().to_lowercase().contains(query)
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub secret: String,
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Self {
            slug: new_link.slug,
            target: new_link.target,
            created_at: new_link.created_at,
            expires_at: new_link.expires_at,
            secret: new_link.secret,
            clicks: 0,
            last_access: None,
        }
    }
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub target: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    /// Applies the patch to `link` in place.
    pub fn apply(self, link: &mut Link) {
        if let Some(target) = self.target {
            link.target = target;
        }
        if let Some(expires_at) = self.expires_at {
            link.expires_at = expires_at;
        }
    }
}

/// Link counts shown on the admin page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

impl LinkSummary {
    /// Tallies active and expired links at `now`.
    pub fn from_links<'a>(links: impl IntoIterator<Item = &'a Link>, now: DateTime<Utc>) -> Self {
        let mut summary = Self::default();
        for link in links {
            summary.total += 1;
            if link.is_expired_at(now) {
                summary.expired += 1;
            } else {
                summary.active += 1;
            }
        }
        summary
    }
}
