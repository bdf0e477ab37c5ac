//! Background worker that persists click events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Number of retries after the first failed write.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the link's counter through
/// [`LinkRepository::record_click`]. Failed writes are retried with
/// exponential backoff; an event that still fails is logged and dropped.
/// Clicks for links deleted in the meantime are ignored.
pub async fn run_click_worker<R>(mut rx: mpsc::Receiver<ClickEvent>, repository: Arc<R>)
where
    R: LinkRepository + ?Sized,
{
    while let Some(event) = rx.recv().await {
        process_event(&event, repository.as_ref()).await;
    }

    info!("Click worker stopped: channel closed");
}

async fn process_event<R>(event: &ClickEvent, repository: &R)
where
    R: LinkRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(5)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || {
        repository.record_click(&event.slug, event.clicked_at)
    })
    .await;

    match result {
        Ok(true) => debug!(
            slug = %event.slug,
            ip = ?event.ip,
            user_agent = ?event.user_agent,
            referer = ?event.referer,
            "Click recorded"
        ),
        Ok(false) => debug!(slug = %event.slug, "Click for missing link ignored"),
        Err(e) => error!(slug = %event.slug, error = %e, "Failed to record click"),
    }
}
