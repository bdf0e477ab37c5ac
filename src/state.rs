//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::JsonLinkRepository;

/// Settings that shape rendered pages and short URLs.
#[derive(Debug, Clone, Default)]
pub struct SiteSettings {
    /// Configured public base; derived from the request when `None`.
    pub base_url: Option<String>,
    /// Analytics measurement ID; enables the tracking redirect page.
    pub gtag_id: Option<String>,
    /// Trust `X-Forwarded-Proto` when building short URLs.
    pub behind_proxy: bool,
}

impl From<&Config> for SiteSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            gtag_id: config.gtag_id.clone(),
            behind_proxy: config.behind_proxy,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<JsonLinkRepository>>,
    pub auth_service: Arc<AuthService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub site: Arc<SiteSettings>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<JsonLinkRepository>>,
        auth_service: Arc<AuthService>,
        click_sender: mpsc::Sender<ClickEvent>,
        site: SiteSettings,
    ) -> Self {
        Self {
            link_service,
            auth_service,
            click_sender,
            site: Arc::new(site),
        }
    }
}
