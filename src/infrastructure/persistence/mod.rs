//! Repository implementations.
//!
//! - [`JsonLinkRepository`] - Links stored in a single JSON document

pub mod json_link_repository;

pub use json_link_repository::{JsonLinkRepository, StoredLink};
