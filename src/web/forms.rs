//! Form and query payloads for the HTML pages.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::utils::expiry::{ExpiryParseError, parse_expiry_input};

/// `POST /create` form.
#[derive(Debug, Default, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub slug: String,
    /// Checkbox; present when ticked.
    pub never_expires: Option<String>,
    #[serde(default)]
    pub expires_date: String,
    #[serde(default)]
    pub expires_time: String,
}

impl CreateForm {
    pub fn expiry(&self) -> Result<Option<DateTime<Utc>>, ExpiryParseError> {
        parse_expiry_input(
            self.never_expires.is_some(),
            &self.expires_date,
            &self.expires_time,
        )
    }

    /// Custom slug, `None` when left blank.
    pub fn custom_slug(&self) -> Option<String> {
        Some(self.slug.trim().to_string()).filter(|s| !s.is_empty())
    }
}

/// `POST /manage/{slug}` form.
#[derive(Debug, Default, Deserialize)]
pub struct ManageForm {
    /// `delete` deletes the link; anything else updates it.
    #[serde(default)]
    pub action: String,
    /// New target; blank keeps the current one.
    #[serde(default)]
    pub target: String,
    pub never_expires: Option<String>,
    #[serde(default)]
    pub expires_date: String,
    #[serde(default)]
    pub expires_time: String,
}

impl ManageForm {
    pub fn is_delete(&self) -> bool {
        self.action.trim().eq_ignore_ascii_case("delete")
    }

    pub fn expiry(&self) -> Result<Option<DateTime<Utc>>, ExpiryParseError> {
        parse_expiry_input(
            self.never_expires.is_some(),
            &self.expires_date,
            &self.expires_time,
        )
    }

    pub fn new_target(&self) -> Option<String> {
        Some(self.target.trim().to_string()).filter(|t| !t.is_empty())
    }
}

/// `?slug=&key=` on the manage pages.
#[derive(Debug, Default, Deserialize)]
pub struct ManageQuery {
    pub slug: Option<String>,
    pub key: Option<String>,
    pub notice: Option<String>,
}

/// `GET /admin` query.
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub q: String,
    pub notice: Option<String>,
    pub slug: Option<String>,
}

/// `POST /admin/login` form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
}
