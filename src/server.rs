//! HTTP server initialization and runtime setup.
//!
//! Opens the link store, spawns the click worker, and runs the Axum server
//! until Ctrl-C or SIGTERM.

use crate::application::services::{AuthService, LinkService};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::persistence::JsonLinkRepository;
use crate::routes::app_router;
use crate::state::{AppState, SiteSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - JSON link store (created if missing, recovered from backup if corrupt)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The link store cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository = Arc::new(
        JsonLinkRepository::open(&config.db_path)
            .await
            .with_context(|| format!("Failed to open link store {}", config.db_path.display()))?,
    );

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(click_rx, link_repository.clone()));
    tracing::info!("Click worker started");

    let link_service = Arc::new(LinkService::new(link_repository));
    let auth_service = Arc::new(AuthService::new(
        config.admin_token.clone(),
        config.session_secret.clone(),
        config.session_ttl_seconds,
    ));

    let state = AppState::new(
        link_service,
        auth_service,
        click_tx,
        SiteSettings::from(&config),
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last sender; the worker drains what is queued and exits.
    if let Err(e) = worker.await {
        tracing::error!("Click worker panicked: {}", e);
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = wait_for_terminate(tokio::signal::unix::signal(
        tokio::signal::unix::SignalKind::terminate(),
    ));

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Resolves on SIGTERM. Never resolves when the handler could not be
/// installed, leaving Ctrl-C as the only way to stop.
#[cfg(unix)]
async fn wait_for_terminate(signal: std::io::Result<tokio::signal::unix::Signal>) {
    match signal {
        Ok(mut signal) => {
            signal.recv().await;
        }
        Err(e) => {
            tracing::error!("Failed to listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
