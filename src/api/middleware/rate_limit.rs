//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Seconds to replenish one request.
    pub per_second: u64,
    pub burst_size: u32,
}

impl Limits {
    /// Public pages and redirects: 2 requests per second, burst of 100.
    pub const PUBLIC: Self = Self {
        per_second: 2,
        burst_size: 100,
    };

    /// Admin pages, admin API and form posts: 1 request per second, burst of 10.
    pub const SECURE: Self = Self {
        per_second: 1,
        burst_size: 10,
    };
}

/// Creates a rate limiter keyed by `key_extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer<K>(
    key_extractor: K,
    limits: Limits,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(limits.per_second)
            .burst_size(limits.burst_size)
            .finish()
            .expect("rate limit periods and burst sizes are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies a rate limiter to `router`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer address. Enable only behind a trusted proxy.
///
/// # Example
///
/// ```rust,ignore
/// let admin = web::routes::admin_routes();
/// let admin = rate_limit::apply(admin, Limits::SECURE, config.behind_proxy);
/// ```
pub fn apply(router: Router<AppState>, limits: Limits, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, limits))
    } else {
        router.layer(layer(PeerIpKeyExtractor, limits))
    }
}
