//! Admin authentication: token checks and signed session cookies.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;
use crate::utils::secret::secrets_match;

type HmacSha256 = Hmac<Sha256>;

/// Default admin session lifetime (12 hours).
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 43_200;

/// Longest accepted admin session lifetime (one year).
pub const MAX_SESSION_TTL_SECONDS: u64 = 31_536_000;

/// Service for admin access.
///
/// Admin access is granted by presenting `ADMIN_TOKEN` once; the service then
/// issues a session value of the form `"<expires_unix>.<hex hmac>"`, where the
/// MAC is HMAC-SHA256 over `admin:<expires_unix>` keyed by the session
/// secret. Sessions carry no server-side state.
///
/// When no admin token is configured every check fails.
#[derive(Clone)]
pub struct AuthService {
    admin_token: Option<String>,
    session_secret: String,
    session_ttl: Duration,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// An empty `admin_token` is treated as unset. `ttl_seconds` is capped
    /// at [`MAX_SESSION_TTL_SECONDS`].
    pub fn new(admin_token: Option<String>, session_secret: String, ttl_seconds: u64) -> Self {
        let ttl_seconds = ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64;

        Self {
            admin_token: admin_token.filter(|t| !t.is_empty()),
            session_secret,
            session_ttl: Duration::try_seconds(ttl_seconds).unwrap_or(Duration::zero()),
        }
    }

    /// Returns true when an admin token is configured.
    pub fn is_enabled(&self) -> bool {
        self.admin_token.is_some()
    }

    /// Session lifetime, for the cookie `Max-Age`.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Checks a presented admin token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when admin is disabled or the token
    /// does not match.
    pub fn verify_admin_token(&self, token: &str) -> Result<(), AppError> {
        let Some(expected) = self.admin_token.as_deref() else {
            return Err(AppError::forbidden(
                "Admin is disabled",
                json!({ "reason": "ADMIN_TOKEN is not set" }),
            ));
        };

        if token.is_empty() || !secrets_match(token, expected) {
            return Err(AppError::forbidden(
                "Forbidden",
                json!({ "reason": "Invalid admin token" }),
            ));
        }

        Ok(())
    }

    /// Issues a signed session value valid until `now + ttl`.
    pub fn issue_session(&self, now: DateTime<Utc>) -> String {
        let expires = now
            .checked_add_signed(self.session_ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();
        format!("{}.{}", expires, hex::encode(self.sign(expires)))
    }

    /// Returns true if `value` is a session this service issued and it has
    /// not expired. Always false when admin is disabled.
    pub fn verify_session(&self, value: &str, now: DateTime<Utc>) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let Some((expires, signature)) = value.split_once('.') else {
            return false;
        };

        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };

        if expires <= now.timestamp() {
            return false;
        }

        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        self.mac(expires).verify_slice(&signature).is_ok()
    }

    fn mac(&self, expires: i64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.session_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(format!("admin:{expires}").as_bytes());
        mac
    }

    fn sign(&self, expires: i64) -> Vec<u8> {
        self.mac(expires).finalize().into_bytes().to_vec()
    }
}
