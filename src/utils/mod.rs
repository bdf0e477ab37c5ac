//! Utility functions used across the application.
//!
//! - [`slug`] - Slug generation and validation
//! - [`secret`] - Per-link secret keys and constant-time comparison
//! - [`expiry`] - Expiration form input parsing
//! - [`target_url`] - Target URL validation
//! - [`base_url`] - Public base URL resolution

pub mod base_url;
pub mod expiry;
pub mod secret;
pub mod slug;
pub mod target_url;
