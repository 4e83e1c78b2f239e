//! Rate limiting middleware using token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Per-client key: the socket peer, or the proxy-reported client behind a trusted proxy.
#[derive(Clone)]
pub enum ClientIpKeyExtractor {
    Peer(PeerIpKeyExtractor),
    Forwarded(SmartIpKeyExtractor),
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        if behind_proxy {
            Self::Forwarded(SmartIpKeyExtractor)
        } else {
            Self::Peer(PeerIpKeyExtractor)
        }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        match self {
            Self::Peer(extractor) => extractor.extract(req),
            Self::Forwarded(extractor) => extractor.extract(req),
        }
    }
}

/// Concrete layer type produced by [`layer`].
pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a per-client rate limiter.
///
/// One token is replenished every `period_ms` milliseconds, up to `burst` tokens.
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy` set the client IP is read from `X-Forwarded-For` / `X-Real-IP`,
/// otherwise from the socket peer address. Enable it only behind a trusted proxy.
///
/// Returns `None` if `period_ms` or `burst` is zero.
pub fn layer(period_ms: u64, burst: u32, behind_proxy: bool) -> Option<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
        .per_millisecond(period_ms)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_burst_is_rejected() {
        assert!(layer(500, 0, false).is_none());
        assert!(layer(0, 10, false).is_none());
    }

    #[test]
    fn test_valid_limits() {
        assert!(layer(500, 50, false).is_some());
        assert!(layer(500, 50, true).is_some());
    }

    #[test]
    fn test_forwarded_extractor_reads_headers() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();

        let key = ClientIpKeyExtractor::new(true).extract(&req).unwrap();

        assert_eq!(key, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_peer_extractor_needs_connect_info() {
        let req = Request::builder().body(()).unwrap();

        assert!(ClientIpKeyExtractor::new(false).extract(&req).is_err());
    }
}
