//! CORS policy for browser calls from the storefront.

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer.
///
/// With a configured origin only that origin is allowed and credentials are
/// permitted. Without one any origin may call, without credentials.
#[must_use]
pub fn cors_layer(allowed_origin: Option<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    match allowed_origin {
        Some(origin) => layer
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        None => layer.allow_origin(Any),
    }
}
