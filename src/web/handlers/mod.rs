//! HTML page handlers.

pub mod admin;
pub mod home;
pub mod manage;
pub mod redirect;

pub use admin::{
    admin_delete_handler, admin_handler, admin_impersonate_handler, admin_login_handler,
    admin_logout_handler,
};
pub use home::{create_handler, index_handler};
pub use manage::{manage_edit_handler, manage_post_handler, manage_select_handler};
pub use redirect::redirect_handler;
