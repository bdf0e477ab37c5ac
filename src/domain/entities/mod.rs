//! Core domain entities.
//!
//! - [`Link`] - A short link with its secret key and click counters
//! - [`NewLink`] - Data for inserting a link
//! - [`LinkPatch`] - Partial update of target and expiry
//! - [`LinkSummary`] - Active/expired counts for the admin page

pub mod link;

pub use link::{Link, LinkPatch, LinkSummary, NewLink};
