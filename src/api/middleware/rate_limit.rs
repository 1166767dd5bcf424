//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for page views.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address. The server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> PeerIpGovernorLayer {
    build(2, 100)
}

/// Creates a stricter rate limiter for credential submissions.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Applied to login and signup so passwords cannot be guessed at page-view
/// rates.
///
/// # Example
///
/// ```rust,ignore
/// let auth_routes = Router::new()
///     .route("/login", post(login_submit))
///     .layer(rate_limit::secure_layer());
/// ```
pub fn secure_layer() -> PeerIpGovernorLayer {
    build(1, 10)
}

fn build(per_second: u64, burst_size: u32) -> PeerIpGovernorLayer {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(per_second).burst_size(burst_size);

    // `finish` only fails on a zero period or burst size.
    let governor_conf = Arc::new(
        builder
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
