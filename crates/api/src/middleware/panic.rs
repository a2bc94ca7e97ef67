//! Turn handler panics into the relay's JSON 500.

use std::any::Any;

use axum::response::IntoResponse;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

/// Catch panics below this layer and answer `500 Internal server error`.
///
/// The panic message is only returned to the caller when `expose_details`
/// is set (development).
#[must_use]
pub fn catch_panic_layer(expose_details: bool) -> CatchPanicLayer<PanicHandlerFn> {
    CatchPanicLayer::custom(PanicHandlerFn { expose_details })
}

/// [`tower_http::catch_panic::ResponseForPanic`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct PanicHandlerFn {
    expose_details: bool,
}

impl tower_http::catch_panic::ResponseForPanic for PanicHandlerFn {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> axum::http::Response<Self::ResponseBody> {
        let message = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("panic");

        tracing::error!(panic = message, "Handler panicked");

        AppError::Internal {
            details: self.expose_details.then(|| message.to_string()),
        }
        .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::to_bytes, http::StatusCode, routing::get};
    use tire_disciples_core::ErrorResponse;
    use tower::ServiceExt;

    use super::*;

    #[allow(clippy::panic)]
    async fn boom() -> &'static str {
        panic!("ledger offline")
    }

    async fn call(expose_details: bool) -> (StatusCode, ErrorResponse) {
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(catch_panic_layer(expose_details));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/boom")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let (status, body) = call(false).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.details, None);
    }

    #[tokio::test]
    async fn test_panic_message_exposed_in_development() {
        let (_, body) = call(true).await;
        assert_eq!(body.details.as_deref(), Some("ledger offline"));
    }
}
