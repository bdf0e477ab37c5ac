//! Home page and link creation form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::{public_base_url, short_url};
use crate::utils::expiry::EXPIRY_PARSE_MESSAGE;
use crate::web::error::PageError;
use crate::web::forms::CreateForm;
use crate::web::notice::{Notice, NoticeQuery, manage_location};

/// A freshly created link, shown once with its secret key.
pub struct CreatedLink {
    pub slug: String,
    pub target: String,
    pub full_url: String,
    pub secret: String,
    pub manage_url: String,
    pub expires: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub notice: Option<Notice>,
    pub created: Option<CreatedLink>,
    /// Values echoed back into the form after an error.
    pub target: String,
    pub slug: String,
    pub never_expires: bool,
    pub expires_date: String,
    pub expires_time: String,
}

impl IndexTemplate {
    /// Empty form; "Never expires" starts ticked.
    fn blank(notice: Option<Notice>, created: Option<CreatedLink>) -> Self {
        Self {
            notice,
            created,
            target: String::new(),
            slug: String::new(),
            never_expires: true,
            expires_date: String::new(),
            expires_time: String::new(),
        }
    }
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /?notice=<code>`
pub async fn index_handler(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    IndexTemplate::blank(query.notice(), None)
}

/// Creates a link from the home page form.
///
/// # Endpoint
///
/// `POST /create`
///
/// On success the home page shows the full short URL and the secret key.
/// The target is checked first, then the slug, then the expiry. Invalid
/// input re-renders the form with the message and a 400 (or 409
/// for a taken slug).
pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreateForm>,
) -> Response {
    let slug = form.custom_slug();

    let checked = state
        .link_service
        .check_new_link(&form.target, slug.as_deref())
        .await;

    let result = match (checked, form.expiry()) {
        (Err(err), _) => Err(err),
        (Ok(_), Err(_)) => {
            return form_error(&form, StatusCode::BAD_REQUEST, EXPIRY_PARSE_MESSAGE);
        }
        (Ok(_), Ok(expires_at)) => {
            state
                .link_service
                .create_link(CreateLink {
                    target: form.target.clone(),
                    slug,
                    expires_at,
                })
                .await
        }
    };

    let link = match result {
        Ok(link) => link,
        Err(err @ (AppError::Validation { .. } | AppError::Conflict { .. })) => {
            return form_error(&form, err.status(), &err.to_string());
        }
        Err(err) => return PageError(err).into_response(),
    };

    let base = public_base_url(
        state.site.base_url.as_deref(),
        &headers,
        state.site.behind_proxy,
    );

    let created = CreatedLink {
        full_url: short_url(&base, &link.slug),
        manage_url: format!(
            "{}{}",
            base,
            manage_location(&link.slug, &link.secret, None)
        ),
        expires: link
            .expires_at
            .map(|e| e.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string()),
        slug: link.slug,
        target: link.target,
        secret: link.secret,
    };

    IndexTemplate::blank(Some(Notice::Created), Some(created)).into_response()
}

fn form_error(form: &CreateForm, status: StatusCode, message: &str) -> Response {
    (
        status,
        IndexTemplate {
            notice: Some(Notice::Error(message.to_string())),
            created: None,
            target: form.target.clone(),
            slug: form.slug.clone(),
            never_expires: form.never_expires.is_some(),
            expires_date: form.expires_date.clone(),
            expires_time: form.expires_time.clone(),
        },
    )
        .into_response()
}
