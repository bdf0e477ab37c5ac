//! One-shot messages shown at the top of a page.
//!
//! Handlers that redirect after a POST pass the notice along as
//! `?notice=<code>` so the next page can show it.

use serde::Deserialize;
use url::form_urlencoded;

use crate::utils::expiry::EXPIRY_PARSE_MESSAGE;
use crate::utils::target_url::TARGET_MESSAGE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Created,
    Deleted,
    Saved,
    BadExpiry,
    BadTarget,
    NoSuchSlug,
    AdminDeleted(String),
    LoggedOut,
    /// A message rendered in place, never carried in a URL.
    Error(String),
}

impl Notice {
    /// Parses the `notice` (and `slug`) query parameters.
    pub fn from_code(code: &str, slug: Option<&str>) -> Option<Self> {
        match code {
            "deleted" => Some(Self::Deleted),
            "saved" => Some(Self::Saved),
            "bad_expiry" => Some(Self::BadExpiry),
            "bad_target" => Some(Self::BadTarget),
            "no_such_slug" => Some(Self::NoSuchSlug),
            "admin_deleted" => slug
                .filter(|s| !s.is_empty())
                .map(|s| Self::AdminDeleted(s.to_string())),
            "logged_out" => Some(Self::LoggedOut),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Created => {
                "Short link created. Save your secret key to edit or delete it.".to_string()
            }
            Self::Deleted => "Link deleted.".to_string(),
            Self::Saved => "Changes saved.".to_string(),
            Self::BadExpiry => EXPIRY_PARSE_MESSAGE.to_string(),
            Self::BadTarget => TARGET_MESSAGE.to_string(),
            Self::NoSuchSlug => "No such slug.".to_string(),
            Self::AdminDeleted(slug) => format!("Deleted {slug}."),
            Self::LoggedOut => "Signed out.".to_string(),
            Self::Error(message) => message.clone(),
        }
    }

    /// True for messages styled as errors.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::BadExpiry | Self::BadTarget | Self::NoSuchSlug | Self::Error(_)
        )
    }

    /// Appends this notice to `serializer` as query parameters.
    pub fn append_to(&self, serializer: &mut form_urlencoded::Serializer<'_, String>) {
        let code = match self {
            Self::Created | Self::Error(_) => return,
            Self::Deleted => "deleted",
            Self::Saved => "saved",
            Self::BadExpiry => "bad_expiry",
            Self::BadTarget => "bad_target",
            Self::NoSuchSlug => "no_such_slug",
            Self::LoggedOut => "logged_out",
            Self::AdminDeleted(slug) => {
                serializer.append_pair("notice", "admin_deleted");
                serializer.append_pair("slug", slug);
                return;
            }
        };
        serializer.append_pair("notice", code);
    }
}

/// `?notice=` query parameters understood by every page.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub slug: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        self.notice
            .as_deref()
            .and_then(|code| Notice::from_code(code, self.slug.as_deref()))
    }
}

/// Builds `path` with the notice as its query string.
pub fn with_notice(path: &str, notice: &Notice) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    notice.append_to(&mut serializer);
    let query = serializer.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Location of the manage page for `slug`, optionally with a notice.
pub fn manage_location(slug: &str, key: &str, notice: Option<&Notice>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("key", key);
    if let Some(notice) = notice {
        notice.append_to(&mut serializer);
    }

    format!(
        "/manage/{}?{}",
        form_urlencoded::byte_serialize(slug.as_bytes()).collect::<String>(),
        serializer.finish()
    )
}
