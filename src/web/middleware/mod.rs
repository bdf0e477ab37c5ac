//! Web-specific middleware.

pub mod admin_session;
