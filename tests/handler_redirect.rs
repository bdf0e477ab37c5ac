mod common;

use axum::http::{HeaderValue, StatusCode, header};
use chrono::{Duration, Utc};
use minishort::state::SiteSettings;

#[tokio::test]
async fn test_redirect_success() {
    let mut app = common::spawn_app().await;
    common::create_link(&app.state, "https://example.com/docs?page=2", Some("docs")).await;

    let response = app.server.get("/docs").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        "https://example.com/docs?page=2"
    );

    let event = app.click_rx.try_recv().unwrap();
    assert_eq!(event.slug, "docs");
    assert_eq!(event.ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_redirect_records_request_metadata() {
    let mut app = common::spawn_app().await;
    common::create_link(&app.state, "https://example.com", Some("meta")).await;

    app.server
        .get("/meta")
        .add_header(header::USER_AGENT, HeaderValue::from_static("TestAgent/1.0"))
        .add_header(header::REFERER, HeaderValue::from_static("https://ref.example"))
        .await
        .assert_status(StatusCode::FOUND);

    let event = app.click_rx.try_recv().unwrap();
    assert_eq!(event.user_agent.as_deref(), Some("TestAgent/1.0"));
    assert_eq!(event.referer.as_deref(), Some("https://ref.example"));
}

#[tokio::test]
async fn test_redirect_not_found() {
    let mut app = common::spawn_app().await;

    let response = app.server.get("/nope42").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Not found"));
    assert!(app.click_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_expired_link_is_gone() {
    let mut app = common::spawn_app().await;
    common::create_link_expiring(
        &app.state,
        "https://example.com",
        "old-link",
        Utc::now() - Duration::hours(1),
    )
    .await;

    let response = app.server.get("/old-link").await;

    response.assert_status(StatusCode::GONE);
    assert!(response.text().contains("expired"));
    assert!(app.click_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_future_expiry_still_works() {
    let app = common::spawn_app().await;
    common::create_link_expiring(
        &app.state,
        "https://example.com",
        "soon",
        Utc::now() + Duration::hours(1),
    )
    .await;

    app.server.get("/soon").await.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_redirect_with_tracking_page() {
    let mut app = common::spawn_app_with(
        SiteSettings {
            gtag_id: Some("G-TEST123".to_string()),
            ..common::default_site()
        },
        None,
    )
    .await;
    common::create_link(&app.state, "https://example.com/landing", Some("promo")).await;

    let response = app.server.get("/promo").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("G-TEST123"));
    assert!(html.contains("https://example.com/landing"));
    assert!(html.contains("data-slug=\"promo\""));

    assert_eq!(app.click_rx.try_recv().unwrap().slug, "promo");
}

#[tokio::test]
async fn test_redirect_survives_full_click_queue() {
    let app = common::spawn_app().await;
    common::create_link(&app.state, "https://example.com", Some("busy")).await;

    // Channel capacity in tests is 100; nobody drains it here.
    for _ in 0..105 {
        app.server.get("/busy").await.assert_status(StatusCode::FOUND);
    }
}

#[tokio::test]
async fn test_unknown_multi_segment_path_is_not_found_page() {
    let app = common::spawn_app().await;

    let response = app.server.get("/some/deep/path").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Not found"));
}
