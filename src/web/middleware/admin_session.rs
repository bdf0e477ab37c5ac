//! Cookie session gate for the admin pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use url::form_urlencoded;

use crate::application::services::AuthService;
use crate::state::AppState;
use crate::web::error::ForbiddenTemplate;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "minishort_admin";

/// Login form shown to visitors without a session.
#[derive(Template, WebTemplate)]
#[template(path = "admin_login.html")]
pub struct AdminLoginTemplate {
    pub error: Option<String>,
}

/// Guards admin pages.
///
/// # Authentication Flow
///
/// 1. Admin disabled (`ADMIN_TOKEN` unset) → 403 page
/// 2. Valid `minishort_admin` session cookie → continue
/// 3. `?token=` matching `ADMIN_TOKEN` → continue and start a session
///    (`Set-Cookie` is added to the response)
/// 4. Otherwise → 403 with the login form
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/admin", get(admin_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admin_session::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let auth = &st.auth_service;

    if !auth.is_enabled() {
        return (
            StatusCode::FORBIDDEN,
            ForbiddenTemplate {
                message: "Admin is disabled.".to_string(),
            },
        )
            .into_response();
    }

    let now = Utc::now();

    if session_cookie(req.headers()).is_some_and(|value| auth.verify_session(&value, now)) {
        return next.run(req).await;
    }

    let token = req.uri().query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
    });

    match token {
        Some(token) if auth.verify_admin_token(&token).is_ok() => {
            let secure = is_secure(&st);
            let mut response = next.run(req).await;
            if let Ok(cookie) = session_set_cookie(auth, secure) {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            tracing::info!("Admin session started via token");
            response
        }
        Some(_) => {
            tracing::warn!("Rejected admin token");
            login_page(Some("Invalid admin token."))
        }
        None => login_page(None),
    }
}

/// 403 response with the login form.
pub fn login_page(error: Option<&str>) -> Response {
    (
        StatusCode::FORBIDDEN,
        AdminLoginTemplate {
            error: error.map(str::to_string),
        },
    )
        .into_response()
}

/// Reads the session cookie from the `Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(SESSION_COOKIE), Some(value)) => Some(value.to_string()),
                _ => None,
            }
        })
}

/// `Set-Cookie` value starting a new admin session.
pub fn session_set_cookie(
    auth: &AuthService,
    secure: bool,
) -> Result<HeaderValue, header::InvalidHeaderValue> {
    let value = auth.issue_session(Utc::now());
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        auth.session_ttl().num_seconds(),
        if secure { "; Secure" } else { "" }
    ))
}

/// `Set-Cookie` value clearing the admin session.
pub fn session_clear_cookie() -> HeaderValue {
    HeaderValue::from_static("minishort_admin=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Cookies get the `Secure` flag when the public base URL is HTTPS.
pub fn is_secure(state: &AppState) -> bool {
    state
        .site
        .base_url
        .as_deref()
        .is_some_and(|base| base.starts_with("https://"))
}
