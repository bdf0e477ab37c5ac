//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// An in-memory representation of a redirect, queued for the click worker.
///
/// Passing clicks through a channel keeps the store write off the redirect
/// path.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Sent to the channel (non-blocking, dropped when the queue is full)
/// 3. Persisted by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub slug: String,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "abc123".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        slug: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            slug,
            clicked_at: Utc::now(),
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }
}
