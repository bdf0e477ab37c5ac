//! Browser-facing layer: HTML pages rendered with Askama.
//!
//! # Modules
//!
//! - [`handlers`] - Page handlers (home, manage, redirect, admin)
//! - [`middleware`] - Admin session cookie gate
//! - [`routes`] - Page route configuration
//! - [`error`] - HTML error pages
//! - [`forms`] - Form and query payloads
//! - [`notice`] - One-shot page messages

pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod notice;
pub mod routes;
