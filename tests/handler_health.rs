mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_empty_store() {
    let app = common::spawn_app().await;

    let response = app.server.get("/healthz").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["ok"], true);
    assert_eq!(json["count"], 0);
    assert_eq!(json["click_queue"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_counts_links() {
    let app = common::spawn_app().await;
    common::create_link(&app.state, "https://a.example", None).await;
    common::create_link(&app.state, "https://b.example", None).await;

    let json = app.server.get("/healthz").await.json::<serde_json::Value>();

    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let app = common::spawn_app().await;
    drop(app.click_rx);

    let response = app.server.get("/healthz").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["ok"], false);
    assert_eq!(json["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_health_needs_no_admin_token() {
    let app = common::spawn_app_with(common::default_site(), None).await;

    app.server.get("/healthz").await.assert_status_ok();
}
