//! JSON document implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{NoneAsEmptyString, serde_as};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::expiry::parse_datetime;

/// One record as it appears in the store file.
///
/// Field order matches the sorted key order of the file.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLink {
    #[serde(default)]
    pub clicks: u64,
    pub created_at: String,
    /// Empty string on disk means "never expires".
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub last_access: Option<String>,
    pub secret: String,
    #[serde(default)]
    pub slug: String,
    pub target: String,
}

impl StoredLink {
    fn from_new(new_link: &NewLink) -> Self {
        Self {
            clicks: 0,
            created_at: new_link.created_at.to_rfc3339(),
            expires_at: new_link.expires_at.map(|e| e.to_rfc3339()),
            last_access: None,
            secret: new_link.secret.clone(),
            slug: new_link.slug.clone(),
            target: new_link.target.clone(),
        }
    }

    /// Converts the record into a domain link keyed by `slug`.
    ///
    /// An expiry that cannot be parsed is reported as already passed.
    fn to_link(&self, slug: &str) -> Link {
        let created_at = parse_datetime(&self.created_at).unwrap_or_else(|| {
            warn!(slug, created_at = %self.created_at, "Unparsable creation time in store");
            DateTime::<Utc>::UNIX_EPOCH
        });

        let expires_at = self.expires_at.as_deref().map(|raw| {
            parse_datetime(raw).unwrap_or_else(|| {
                warn!(slug, expires_at = raw, "Unparsable expiry in store, treating as expired");
                DateTime::<Utc>::MIN_UTC
            })
        });

        Link {
            slug: slug.to_string(),
            target: self.target.clone(),
            created_at,
            expires_at,
            secret: self.secret.clone(),
            clicks: self.clicks,
            last_access: self.last_access.as_deref().and_then(parse_datetime),
        }
    }
}

type Document = BTreeMap<String, StoredLink>;

/// Link repository backed by a single JSON document on disk.
///
/// The whole document is held in memory and rewritten on every change:
///
/// 1. the new document is written to `<path>.tmp`
/// 2. the current file is moved to `<path>.bak`
/// 3. `<path>.tmp` is renamed over `<path>`
///
/// The in-memory copy is only replaced once the file write has succeeded, so
/// a failed save leaves both the file and memory at the previous state.
pub struct JsonLinkRepository {
    path: PathBuf,
    links: RwLock<Document>,
}

impl JsonLinkRepository {
    /// Opens the store at `path`, creating an empty document if it is missing.
    ///
    /// A corrupt document is recovered from `<path>.bak` when one exists;
    /// without a backup the store starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the file cannot be created or both
    /// the document and its backup are unreadable.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let links = Self::load(&path).await?;

        info!(path = %path.display(), links = links.len(), "Link store opened");

        Ok(Self {
            path,
            links: RwLock::new(links),
        })
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(path: &Path) -> PathBuf {
        path.with_extension("bak")
    }

    fn temp_path(path: &Path) -> PathBuf {
        path.with_extension("tmp")
    }

    async fn load(path: &Path) -> Result<Document, AppError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str::<Document>(&content) {
                Ok(links) => Ok(links),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Link store is corrupt, trying backup");
                    Self::load_backup(path).await
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tokio::fs::write(path, "{}").await.map_err(|e| {
                    AppError::internal(
                        "Failed to create link store",
                        json!({ "path": path.display().to_string(), "reason": e.to_string() }),
                    )
                })?;
                info!(path = %path.display(), "Created empty link store");
                Ok(Document::new())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Link store is unreadable, trying backup");
                Self::load_backup(path).await
            }
        }
    }

    async fn load_backup(path: &Path) -> Result<Document, AppError> {
        let backup = Self::backup_path(path);

        match tokio::fs::read_to_string(&backup).await {
            Ok(content) => {
                let links: Document = serde_json::from_str(&content).map_err(|e| {
                    AppError::internal(
                        "Link store backup is corrupt",
                        json!({ "path": backup.display().to_string(), "reason": e.to_string() }),
                    )
                })?;
                info!(path = %backup.display(), links = links.len(), "Recovered link store from backup");
                Ok(links)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "No backup found, starting with an empty link store");
                Ok(Document::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, links: &Document) -> Result<(), AppError> {
        let body = serde_json::to_string_pretty(links)?;
        let tmp = Self::temp_path(&self.path);

        tokio::fs::write(&tmp, body).await?;

        if tokio::fs::try_exists(&self.path).await? {
            tokio::fs::rename(&self.path, Self::backup_path(&self.path)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), links = links.len(), "Link store saved");

        Ok(())
    }

    /// Applies `change` to a copy of the document and saves it.
    ///
    /// `change` returns `Ok(None)` when it made no modification; nothing is
    /// written in that case.
    async fn mutate<T, F>(&self, change: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut Document) -> Result<Option<T>, AppError> + Send,
        T: Send,
    {
        let mut guard = self.links.write().await;
        let mut next = guard.clone();

        let Some(out) = change(&mut next)? else {
            return Ok(None);
        };

        self.persist(&next).await?;
        *guard = next;

        Ok(Some(out))
    }
}

#[async_trait]
impl LinkRepository for JsonLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = self
            .mutate(|links| {
                if links.contains_key(&new_link.slug) {
                    return Err(AppError::conflict(
                        "That slug is already taken. Try another.",
                        json!({ "slug": new_link.slug }),
                    ));
                }
                links.insert(new_link.slug.clone(), StoredLink::from_new(&new_link));
                Ok(Some(Link::from(new_link)))
            })
            .await?;

        link.ok_or_else(|| AppError::internal("Link was not stored", json!({})))
    }

    async fn find(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let links = self.links.read().await;
        Ok(links.get(slug).map(|stored| stored.to_link(slug)))
    }

    async fn exists(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.links.read().await.contains_key(slug))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let links = self.links.read().await;
        let mut all: Vec<Link> = links
            .iter()
            .map(|(slug, stored)| stored.to_link(slug))
            .collect();

        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(all)
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.links.read().await.len())
    }

    async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let link = self
            .mutate(|links| {
                let stored = links.get_mut(slug).ok_or_else(|| {
                    AppError::not_found("Short link not found", json!({ "slug": slug }))
                })?;

                if let Some(target) = patch.target {
                    stored.target = target;
                }
                if let Some(expires_at) = patch.expires_at {
                    stored.expires_at = expires_at.map(|e| e.to_rfc3339());
                }

                Ok(Some(stored.to_link(slug)))
            })
            .await?;

        link.ok_or_else(|| AppError::internal("Link was not updated", json!({ "slug": slug })))
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let removed = self
            .mutate(|links| Ok(links.remove(slug).map(|_| ())))
            .await?;

        Ok(removed.is_some())
    }

    async fn record_click(&self, slug: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let recorded = self
            .mutate(|links| {
                Ok(links.get_mut(slug).map(|stored| {
                    stored.clicks += 1;
                    stored.last_access = Some(at.to_rfc3339());
                }))
            })
            .await?;

        Ok(recorded.is_some())
    }
}
