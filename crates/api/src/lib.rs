//! Tire Disciples payment relay.
//!
//! A small stateless HTTP service in front of the payment processor:
//!
//! - `POST /api/payments/process` charges a card token
//! - `GET /api/payments/{payment_id}` looks a payment up
//! - `POST /api/orders/cash` logs a cash order
//! - `GET /health` reports liveness
//!
//! The binary wires in Square; tests build the same router with a fake
//! [`processor::PaymentProcessor`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod processor;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Request, Response},
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the relay's router with its full middleware stack.
///
/// Rate limiting keys on the socket peer, so serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`. Set
/// `trust_proxy_headers` only when a proxy in front of the relay overwrites
/// `X-Forwarded-For`. Sentry layers are added by the binary on top of this.
pub fn app(
    state: AppState,
    allowed_origin: Option<HeaderValue>,
    trust_proxy_headers: bool,
) -> Router {
    let expose_details = state.is_development();

    let api = routes::api_routes().layer(middleware::api_rate_limiter(trust_proxy_headers));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(middleware::catch_panic_layer(expose_details))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(middleware::cors_layer(allowed_origin))
}
