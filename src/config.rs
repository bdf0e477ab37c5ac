//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! A `.env` file is read by `main.rs` via `dotenvy` before this module runs.
//!
//! ## Variables
//!
//! - `URL_DB_PATH` - JSON store path (default: `url_db.json`)
//! - `BASE_URL` - Public base for short URLs (default: derived from the request)
//! - `GTAG_ID` - Analytics measurement ID; enables the tracking redirect page
//! - `ADMIN_TOKEN` - Admin token; admin pages and API are disabled when unset
//! - `SESSION_SECRET` - Admin session signing key (default: random per process)
//! - `SESSION_TTL_SECONDS` - Admin session lifetime (default: 43200)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-*` headers (default: `false`)

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::application::services::auth_service::{
    DEFAULT_SESSION_TTL_SECONDS, MAX_SESSION_TTL_SECONDS,
};
use crate::utils::secret::generate_token;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub base_url: Option<String>,
    pub gtag_id: Option<String>,
    pub admin_token: Option<String>,
    pub session_secret: String,
    /// True when `SESSION_SECRET` was not set and a random one was generated.
    /// Admin sessions then do not survive a restart.
    pub session_secret_generated: bool,
    pub session_ttl_seconds: u64,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub click_queue_capacity: usize,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers
    /// and the public scheme from X-Forwarded-Proto.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("url_db.json"),
            base_url: None,
            gtag_id: None,
            admin_token: None,
            session_secret: generate_token(32),
            session_secret_generated: true,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            click_queue_capacity: 10_000,
            behind_proxy: false,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or blank optional variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let db_path = non_empty("URL_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let (session_secret, session_secret_generated) = match non_empty("SESSION_SECRET") {
            Some(secret) => (secret, false),
            None => (defaults.session_secret, true),
        };

        let session_ttl_seconds =
            parse_var("SESSION_TTL_SECONDS")?.unwrap_or(defaults.session_ttl_seconds);

        let click_queue_capacity =
            parse_var("CLICK_QUEUE_CAPACITY")?.unwrap_or(defaults.click_queue_capacity);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            db_path,
            base_url: non_empty("BASE_URL"),
            gtag_id: non_empty("GTAG_ID"),
            admin_token: non_empty("ADMIN_TOKEN"),
            session_secret,
            session_secret_generated,
            session_ttl_seconds,
            listen_addr: non_empty("LISTEN").unwrap_or(defaults.listen_addr),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: non_empty("LOG_FORMAT").unwrap_or(defaults.log_format),
            click_queue_capacity,
            behind_proxy,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `click_queue_capacity` is outside 100..=1000000
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `base_url` is not an HTTP(S) URL
    /// - `session_secret` is empty
    /// - `session_ttl_seconds` is zero or longer than a year
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref base_url) = self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                base_url
            );
        }

        if self.session_secret.is_empty() {
            anyhow::bail!("SESSION_SECRET must not be empty");
        }

        if self.session_ttl_seconds == 0 {
            anyhow::bail!("SESSION_TTL_SECONDS must be greater than 0");
        }

        if self.session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
            anyhow::bail!(
                "SESSION_TTL_SECONDS is too large (max: {}), got {}",
                MAX_SESSION_TTL_SECONDS,
                self.session_ttl_seconds
            );
        }

        Ok(())
    }

    /// Returns whether admin pages and the admin API are enabled.
    pub fn is_admin_enabled(&self) -> bool {
        self.admin_token.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Store: {}", self.db_path.display());
        tracing::info!(
            "  Base URL: {}",
            self.base_url.as_deref().unwrap_or("(from request)")
        );
        tracing::info!(
            "  Analytics: {}",
            if self.gtag_id.is_some() { "enabled" } else { "disabled" }
        );
        tracing::info!(
            "  Admin: {}",
            if self.is_admin_enabled() { "enabled" } else { "disabled" }
        );

        if self.session_secret_generated {
            tracing::warn!("  SESSION_SECRET not set; admin sessions end on restart");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
    }
}

/// Reads a variable, treating blank values as unset.
fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a numeric variable if it is set.
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| anyhow::anyhow!("{key} must be a number, got '{v}': {e}"))
        })
        .transpose()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
