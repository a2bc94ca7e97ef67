//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as JSON
//! [`ErrorResponse`] bodies; server-side failures are captured to Sentry
//! before the response goes out.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tire_disciples_core::ErrorResponse;

use crate::processor::ProcessorError;

/// Application-level error type for the payment relay.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Charging the card failed.
    #[error("Payment processing failed")]
    Payment(#[source] ProcessorError),

    /// Looking up a payment failed.
    #[error("Failed to fetch payment details")]
    PaymentLookup(#[source] ProcessorError),

    /// Recording a cash order failed.
    #[error("Failed to process cash order")]
    CashOrder { details: Option<String> },

    /// Internal server error.
    #[error("Internal server error")]
    Internal { details: Option<String> },
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Payment(_)
            | Self::PaymentLookup(_)
            | Self::CashOrder { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::BadRequest(_) => None,
            Self::Payment(err) | Self::PaymentLookup(err) => Some(err.to_string()),
            Self::CashOrder { details } | Self::Internal { details } => details.clone(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                details = self.details().as_deref().unwrap_or_default(),
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
