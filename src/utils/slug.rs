//! Slug generation and validation utilities.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Characters used for generated slugs.
pub const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated slugs before collisions force a longer one.
pub const DEFAULT_SLUG_LENGTH: usize = 6;

/// Upper bound on slug length, generated or custom.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Pattern custom slugs must match.
pub static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,64}$").expect("slug regex is valid"));

/// Slugs that would shadow application routes.
pub const RESERVED_SLUGS: &[&str] = &["admin", "api", "create", "healthz", "manage", "static"];

/// Generates a random slug of `length` characters from [`SLUG_ALPHABET`].
pub fn generate_slug(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `slug` collides with an application route.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Validates a user-provided custom slug.
///
/// # Rules
///
/// - 3-64 characters
/// - Letters, digits, underscore and hyphen only
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if !SLUG_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "Custom slug must be 3–64 characters of letters, numbers, underscore, or hyphen.",
            json!({ "slug": slug }),
        ));
    }

    if is_reserved(slug) {
        return Err(AppError::bad_request(
            "That slug is reserved. Try another.",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}
