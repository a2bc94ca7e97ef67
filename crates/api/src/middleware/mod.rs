//! HTTP middleware stack for the payment relay.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. CORS (storefront origin)
//! 3. Security headers
//! 4. Panic catcher (renders a JSON 500)
//! 5. `TraceLayer` (request span)
//! 6. Request ID (recorded in the span)
//! 7. Rate limiting on `/api/*` (governor)

pub mod cors;
pub mod panic;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use cors::cors_layer;
pub use panic::catch_panic_layer;
pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
