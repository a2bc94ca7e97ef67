//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Requests are keyed on the socket peer. Forwarding headers are only
//! honoured when the relay is configured to sit behind a trusted proxy;
//! otherwise any caller could pick their own key.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor for the client IP.
///
/// With `trust_proxy_headers` set: `X-Forwarded-For` (first hop), then
/// `X-Real-IP`, then the connection's peer address. Without it, only the
/// peer address.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = Self::forwarded_ip(req)
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for `/api/*`: 100 requests per 15 minutes per IP.
///
/// Configuration: 1 token every 9 seconds (replenish), burst of 100.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(9)` and `burst_size(100)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(9) // 900 s / 100 requests
        .burst_size(100)
        .finish()
        .expect("rate limiter config with per_second(9) and burst_size(100) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/orders/cash");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    const PROXIED: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: true,
    };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: false,
    };

    fn from_peer(mut req: Request<()>, peer: &str) -> Request<()> {
        let peer: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        req
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = request(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.2"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(
            PROXIED.extract(&req).unwrap(),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request(&[("x-forwarded-for", "unknown"), ("x-real-ip", "198.51.100.1")]);
        assert_eq!(
            PROXIED.extract(&req).unwrap(),
            "198.51.100.1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_peer_address_fallback() {
        let req = request(&[]);
        assert!(PROXIED.extract(&req).is_err());

        let req = from_peer(req, "192.0.2.44:51234");
        assert_eq!(
            PROXIED.extract(&req).unwrap(),
            "192.0.2.44".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_headers_ignored_without_trusted_proxy() {
        let req = from_peer(
            request(&[
                ("x-forwarded-for", "203.0.113.7"),
                ("x-real-ip", "198.51.100.1"),
            ]),
            "192.0.2.44:51234",
        );
        assert_eq!(
            DIRECT.extract(&req).unwrap(),
            "192.0.2.44".parse::<IpAddr>().unwrap()
        );

        let req = request(&[("x-forwarded-for", "203.0.113.7")]);
        assert!(DIRECT.extract(&req).is_err());
    }
}
