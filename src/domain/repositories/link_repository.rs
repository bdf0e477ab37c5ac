//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonLinkRepository`] - JSON document store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists.
    /// Returns [`AppError::Internal`] if the store cannot be written.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by slug.
    async fn find(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if the slug is taken.
    async fn exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Returns every link, newest first.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Counts stored links.
    async fn count(&self) -> Result<usize, AppError>;

    /// Partially updates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Link, AppError>;

    /// Deletes a link. Returns `Ok(false)` if it did not exist.
    async fn delete(&self, slug: &str) -> Result<bool, AppError>;

    /// Increments the click counter and sets `last_access`.
    ///
    /// Returns `Ok(false)` if the link no longer exists.
    async fn record_click(&self, slug: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
}
