//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and give HTTP handlers and the admin
//! CLI one place where link rules live.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, redirects and management
//! - [`services::auth_service::AuthService`] - Admin token and session cookies

pub mod services;
