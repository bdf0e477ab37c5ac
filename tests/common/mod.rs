#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, middleware, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use minishort::api;
use minishort::api::handlers::health_handler;
use minishort::api::middleware::auth;
use minishort::application::services::{AuthService, CreateLink, LinkService};
use minishort::domain::click_event::ClickEvent;
use minishort::domain::entities::Link;
use minishort::infrastructure::persistence::JsonLinkRepository;
use minishort::state::{AppState, SiteSettings};
use minishort::web;
use minishort::web::error::not_found_handler;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::Layer;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const BASE_URL: &str = "https://sho.rt";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Settings used by most tests.
pub fn default_site() -> SiteSettings {
    SiteSettings {
        base_url: Some(BASE_URL.to_string()),
        gtag_id: None,
        behind_proxy: false,
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub click_rx: mpsc::Receiver<ClickEvent>,
    pub repository: Arc<JsonLinkRepository>,
    pub dir: TempDir,
}

/// State on a fresh JSON store in a temporary directory.
pub async fn create_test_state(
    dir: &TempDir,
    site: SiteSettings,
    admin_token: Option<&str>,
) -> (
    AppState,
    mpsc::Receiver<ClickEvent>,
    Arc<JsonLinkRepository>,
) {
    let repository = Arc::new(
        JsonLinkRepository::open(dir.path().join("url_db.json"))
            .await
            .unwrap(),
    );
    let (tx, rx) = mpsc::channel(100);

    let link_service = Arc::new(LinkService::new(repository.clone()));
    let auth_service = Arc::new(AuthService::new(
        admin_token.map(str::to_string),
        "test-session-secret".to_string(),
        3600,
    ));

    let state = AppState::new(link_service, auth_service, tx, site);

    (state, rx, repository)
}

/// The application routes without rate limiting, with a fixed peer address.
pub fn test_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(web::routes::public_routes())
        .merge(web::routes::form_routes())
        .merge(web::routes::redirect_routes())
        .merge(web::routes::admin_routes(state.clone()))
        .route("/healthz", get(health_handler))
        .nest("/api", api_router)
        .fallback(not_found_handler)
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(default_site(), Some(ADMIN_TOKEN)).await
}

pub async fn spawn_app_with(site: SiteSettings, admin_token: Option<&str>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let (state, click_rx, repository) = create_test_state(&dir, site, admin_token).await;
    let server = TestServer::new(test_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        click_rx,
        repository,
        dir,
    }
}

pub async fn create_link(state: &AppState, target: &str, slug: Option<&str>) -> Link {
    state
        .link_service
        .create_link(CreateLink {
            target: target.to_string(),
            slug: slug.map(str::to_string),
            expires_at: None,
        })
        .await
        .unwrap()
}

pub async fn create_link_expiring(
    state: &AppState,
    target: &str,
    slug: &str,
    expires_at: DateTime<Utc>,
) -> Link {
    state
        .link_service
        .create_link(CreateLink {
            target: target.to_string(),
            slug: Some(slug.to_string()),
            expires_at: Some(expires_at),
        })
        .await
        .unwrap()
}

/// `Cookie` header value carrying a valid admin session.
pub fn admin_cookie(state: &AppState) -> String {
    format!(
        "minishort_admin={}",
        state.auth_service.issue_session(Utc::now())
    )
}
