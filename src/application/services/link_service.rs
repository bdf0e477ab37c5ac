//! Link creation, resolution and management service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::domain::entities::{Link, LinkPatch, LinkSummary, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::secret::{generate_secret, secrets_match};
use crate::utils::slug::{
    DEFAULT_SLUG_LENGTH, MAX_SLUG_LENGTH, generate_slug, is_reserved, validate_custom_slug,
};
use crate::utils::target_url::{TARGET_MESSAGE, validate_target};

/// Attempts per slug length before a longer slug is tried.
const ATTEMPTS_PER_LENGTH: usize = 100;

/// Input for creating a short link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub target: String,
    /// Custom slug; a random one is generated when `None`.
    pub slug: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service owning every rule about short links.
///
/// Public callers go through [`Self::create_link`], [`Self::resolve`] and the
/// key-checked manage operations. Admin callers use the unchecked variants.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Checks the target and custom slug of a new link, in that order.
    ///
    /// Returns the trimmed target and the custom slug, `None` when blank.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the target is not HTTP(S) or the
    /// custom slug is malformed or reserved.
    ///
    /// Returns [`AppError::Conflict`] if the custom slug is taken.
    pub async fn check_new_link(
        &self,
        target: &str,
        slug: Option<&str>,
    ) -> Result<(String, Option<String>), AppError> {
        let target = validate_target(target).map_err(|e| {
            AppError::bad_request(TARGET_MESSAGE, json!({ "reason": e.to_string() }))
        })?;

        let slug = match slug.map(str::trim) {
            Some(custom) if !custom.is_empty() => {
                validate_custom_slug(custom)?;

                if self.link_repository.exists(custom).await? {
                    return Err(AppError::conflict(
                        "That slug is already taken. Try another.",
                        json!({ "slug": custom }),
                    ));
                }

                Some(custom.to_string())
            }
            _ => None,
        };

        Ok((target, slug))
    }

    /// Creates a short link.
    ///
    /// # Errors
    ///
    /// See [`Self::check_new_link`].
    pub async fn create_link(&self, request: CreateLink) -> Result<Link, AppError> {
        let (target, slug) = self
            .check_new_link(&request.target, request.slug.as_deref())
            .await?;

        let slug = match slug {
            Some(custom) => custom,
            None => self.generate_unique_slug().await?,
        };

        let link = self
            .link_repository
            .insert(NewLink {
                slug,
                target,
                created_at: Utc::now(),
                expires_at: request.expires_at,
                secret: generate_secret(),
            })
            .await?;

        metrics::counter!("minishort_links_created_total").increment(1);
        info!(slug = %link.slug, "Short link created");

        Ok(link)
    }

    /// Looks up a link for redirection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown slugs and [`AppError::Gone`]
    /// for expired links.
    pub async fn resolve(&self, slug: &str) -> Result<Link, AppError> {
        let link = self.get(slug).await?;

        if link.is_expired() {
            return Err(AppError::gone(
                "This link has expired",
                json!({ "slug": slug }),
            ));
        }

        Ok(link)
    }

    /// Records a redirect. Returns `false` if the link no longer exists.
    pub async fn record_click(&self, slug: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        self.link_repository.record_click(slug, at).await
    }

    /// Checks the per-link secret key and returns the link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown slugs and
    /// [`AppError::Forbidden`] when the key does not match.
    pub async fn authorize(&self, slug: &str, key: &str) -> Result<Link, AppError> {
        let link = self.get(slug).await?;

        if !secrets_match(key, &link.secret) {
            return Err(AppError::forbidden(
                "Invalid secret key",
                json!({ "slug": slug }),
            ));
        }

        Ok(link)
    }

    /// Updates target and/or expiry after checking the secret key.
    ///
    /// # Errors
    ///
    /// See [`Self::authorize`]; also returns [`AppError::Validation`] for a
    /// non-HTTP(S) target.
    pub async fn update_link(
        &self,
        slug: &str,
        key: &str,
        patch: LinkPatch,
    ) -> Result<Link, AppError> {
        self.authorize(slug, key).await?;
        self.admin_update(slug, patch).await
    }

    /// Deletes a link after checking the secret key.
    pub async fn delete_link(&self, slug: &str, key: &str) -> Result<(), AppError> {
        self.authorize(slug, key).await?;
        self.admin_delete(slug).await
    }

    /// Retrieves a link regardless of expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    pub async fn get(&self, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "slug": slug })))
    }

    /// Lists links newest first, filtered by a case-insensitive substring of
    /// slug, target or creation time. An empty query returns every link.
    pub async fn search(&self, query: &str) -> Result<Vec<Link>, AppError> {
        let query = query.trim().to_lowercase();
        let links = self.link_repository.list_all().await?;

        if query.is_empty() {
            return Ok(links);
        }

        Ok(links.into_iter().filter(|l| l.matches(&query)).collect())
    }

    /// Counts total, active and expired links.
    pub async fn summary(&self) -> Result<LinkSummary, AppError> {
        let links = self.link_repository.list_all().await?;
        Ok(LinkSummary::from_links(&links, Utc::now()))
    }

    /// Number of stored links.
    pub async fn count(&self) -> Result<usize, AppError> {
        self.link_repository.count().await
    }

    /// Updates a link without a secret key check.
    pub async fn admin_update(&self, slug: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let target = match patch.target {
            Some(t) => Some(validate_target(&t).map_err(|e| {
                AppError::bad_request(TARGET_MESSAGE, json!({ "reason": e.to_string() }))
            })?),
            None => None,
        };

        let link = self
            .link_repository
            .update(
                slug,
                LinkPatch {
                    target,
                    expires_at: patch.expires_at,
                },
            )
            .await?;

        info!(slug, "Short link updated");
        Ok(link)
    }

    /// Deletes a link without a secret key check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    pub async fn admin_delete(&self, slug: &str) -> Result<(), AppError> {
        if !self.link_repository.delete(slug).await? {
            return Err(AppError::not_found("No such slug.", json!({ "slug": slug })));
        }

        info!(slug, "Short link deleted");
        Ok(())
    }

    /// Generates a slug that is neither taken nor reserved.
    ///
    /// Tries [`ATTEMPTS_PER_LENGTH`] random slugs per length, growing the
    /// length after each round of collisions.
    async fn generate_unique_slug(&self) -> Result<String, AppError> {
        for length in DEFAULT_SLUG_LENGTH..=MAX_SLUG_LENGTH {
            for _ in 0..ATTEMPTS_PER_LENGTH {
                let slug = generate_slug(length);

                if !is_reserved(&slug) && !self.link_repository.exists(&slug).await? {
                    return Ok(slug);
                }
            }
        }

        Err(AppError::internal(
            "Failed to generate unique slug",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn test_link(slug: &str, expires_at: Option<DateTime<Utc>>) -> Link {
        Link {
            slug: slug.to_string(),
            target: "https://example.com".to_string(),
            created_at: Utc::now(),
            expires_at,
            secret: "right-key".to_string(),
            clicks: 0,
            last_access: None,
        }
    }

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_create_with_generated_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new_link| {
                new_link.slug.len() == DEFAULT_SLUG_LENGTH
                    && new_link.target == "https://example.com"
                    && new_link.secret.len() == 22
            })
            .times(1)
            .returning(|new_link| Ok(Link::from(new_link)));

        let link = service(repo)
            .create_link(CreateLink {
                target: " https://example.com ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.clicks, 0);
        assert!(link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut repo = MockLinkRepository::new();
        let mut calls = 0;
        repo.expect_exists().times(3).returning(move |_| {
            calls += 1;
            Ok(calls < 3)
        });
        repo.expect_insert()
            .times(1)
            .returning(|new_link| Ok(Link::from(new_link)));

        let result = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                ..Default::default()
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_grows_slug_after_many_collisions() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .withf(|slug| slug.len() == DEFAULT_SLUG_LENGTH)
            .times(ATTEMPTS_PER_LENGTH)
            .returning(|_| Ok(true));
        repo.expect_exists()
            .withf(|slug| slug.len() == DEFAULT_SLUG_LENGTH + 1)
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .returning(|new_link| Ok(Link::from(new_link)));

        let link = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.slug.len(), DEFAULT_SLUG_LENGTH + 1);
    }

    #[tokio::test]
    async fn test_create_with_custom_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .with(eq("my-link"))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new_link| new_link.slug == "my-link")
            .times(1)
            .returning(|new_link| Ok(Link::from(new_link)));

        let link = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                slug: Some("my-link".to_string()),
                expires_at: None,
            })
            .await
            .unwrap();

        assert_eq!(link.slug, "my-link");
    }

    #[tokio::test]
    async fn test_create_blank_custom_slug_generates_one() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .returning(|new_link| Ok(Link::from(new_link)));

        let link = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                slug: Some("   ".to_string()),
                expires_at: None,
            })
            .await
            .unwrap();

        assert_eq!(link.slug.len(), DEFAULT_SLUG_LENGTH);
    }

    #[tokio::test]
    async fn test_create_custom_slug_taken() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let err = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                slug: Some("taken".to_string()),
                expires_at: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "That slug is already taken. Try another.");
    }

    #[tokio::test]
    async fn test_create_invalid_custom_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().times(0);

        let err = service(repo)
            .create_link(CreateLink {
                target: "https://example.com".to_string(),
                slug: Some("no".to_string()),
                expires_at: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_check_new_link_checks_target_first() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists().times(0);

        let err = service(repo)
            .check_new_link("mailto:someone@example.com", Some("no"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), TARGET_MESSAGE);
    }

    #[tokio::test]
    async fn test_check_new_link_trims_and_blanks() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists()
            .withf(|slug| slug.to_string() == "mine")
            .times(1)
            .returning(|_| Ok(false));
        let svc = service(repo);

        let (target, slug) = svc
            .check_new_link(" https://example.com ", Some(" mine "))
            .await
            .unwrap();
        assert_eq!(target, "https://example.com");
        assert_eq!(slug.as_deref(), Some("mine"));

        let (_, slug) = svc
            .check_new_link("https://example.com", Some("   "))
            .await
            .unwrap();
        assert_eq!(slug, None);
    }

    #[tokio::test]
    async fn test_create_rejects_non_http_target() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(0);

        let err = service(repo)
            .create_link(CreateLink {
                target: "ftp://example.com".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), TARGET_MESSAGE);
    }

    #[tokio::test]
    async fn test_resolve_active_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .with(eq("abc"))
            .returning(|slug| Ok(Some(test_link(slug, None))));

        let link = service(repo).resolve("abc").await.unwrap();
        assert_eq!(link.target, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find().returning(|_| Ok(None));

        let err = service(repo).resolve("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_is_gone() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, Some(Utc::now() - Duration::minutes(1))))));

        let err = service(repo).resolve("old").await.unwrap_err();
        assert!(matches!(err, AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_authorize_checks_key() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, None))));
        let svc = service(repo);

        assert!(svc.authorize("abc", "right-key").await.is_ok());
        assert!(matches!(
            svc.authorize("abc", "wrong-key").await.unwrap_err(),
            AppError::Forbidden { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_with_wrong_key_does_not_write() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, None))));
        repo.expect_update().times(0);

        let err = service(repo)
            .update_link("abc", "wrong", LinkPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_validates_target() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, None))));
        repo.expect_update().times(0);

        let err = service(repo)
            .update_link(
                "abc",
                "right-key",
                LinkPatch {
                    target: Some("mailto:me@example.com".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, None))));
        repo.expect_update()
            .withf(|slug, patch| {
                slug == "abc"
                    && patch.target.as_deref() == Some("https://rust-lang.org")
                    && patch.expires_at == Some(None)
            })
            .times(1)
            .returning(|slug, patch| {
                let mut link = test_link(slug, None);
                patch.apply(&mut link);
                Ok(link)
            });

        let link = service(repo)
            .update_link(
                "abc",
                "right-key",
                LinkPatch {
                    target: Some(" https://rust-lang.org".to_string()),
                    expires_at: Some(None),
                },
            )
            .await
            .unwrap();

        assert_eq!(link.target, "https://rust-lang.org");
    }

    #[tokio::test]
    async fn test_delete_with_key() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .returning(|slug| Ok(Some(test_link(slug, None))));
        repo.expect_delete()
            .with(eq("abc"))
            .times(1)
            .returning(|_| Ok(true));

        assert!(service(repo).delete_link("abc", "right-key").await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_delete_missing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let err = service(repo).admin_delete("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_all().returning(|| {
            Ok(vec![
                Link {
                    target: "https://Docs.rs/serde".to_string(),
                    ..test_link("serde", None)
                },
                test_link("other", None),
            ])
        });
        let svc = service(repo);

        let found = svc.search("  DOCS.RS ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "serde");

        assert_eq!(svc.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summary() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_all().returning(|| {
            Ok(vec![
                test_link("a", None),
                test_link("b", Some(Utc::now() - Duration::hours(1))),
                test_link("c", Some(Utc::now() + Duration::hours(1))),
            ])
        });

        let summary = service(repo).summary().await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.expired, 1);
    }
}
