//! # MiniShort
//!
//! A tiny URL shortener built with Axum. Links live in a single JSON
//! document; each link has a secret key that lets its creator edit or
//! delete it, an optional expiry, and a click counter.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link entity, repository trait, click events
//! - **Application Layer** ([`application`]) - Link rules and admin authentication
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON document store
//! - **API Layer** ([`api`]) - Admin JSON API, health check, middleware
//! - **Web Layer** ([`web`]) - HTML pages for creating, managing and administering links
//!
//! ## Features
//!
//! - Random or custom slugs
//! - Per-link secret keys for editing and deletion
//! - Optional expiry (expired links answer 410 Gone)
//! - Asynchronous click counting with retry logic
//! - Optional analytics page fired before the redirect
//! - Admin pages and API gated by `ADMIN_TOKEN`
//! - Rate limiting and structured logging
//!
//! ## Quick Start
//!
//! ```bash
//! export URL_DB_PATH="url_db.json"
//! export ADMIN_TOKEN="$(cargo run --bin admin -- secret)"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, CreateLink, LinkService};
    pub use crate::domain::entities::{Link, LinkPatch, LinkSummary, NewLink};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::JsonLinkRepository;
    pub use crate::state::{AppState, SiteSettings};
}
