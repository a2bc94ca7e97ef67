//! Payment processor seam.
//!
//! Routes talk to a [`PaymentProcessor`]; production wires in
//! [`SquareClient`], tests wire in fakes.

mod square;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tire_disciples_core::CurrencyCode;

pub use square::{SQUARE_API_VERSION, SquareApiError, SquareClient};

/// Errors that can occur when calling the processor.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor refused the request.
    #[error("{}", describe(.errors, .status))]
    Api {
        status: u16,
        errors: Vec<SquareApiError>,
    },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client construction failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[allow(clippy::trivially_copy_pass_by_ref)] // called from the derived Display with field refs
fn describe(errors: &[SquareApiError], status: &u16) -> String {
    let details: Vec<&str> = errors
        .iter()
        .map(|e| e.detail.as_deref().unwrap_or(e.code.as_str()))
        .collect();
    if details.is_empty() {
        format!("processor returned HTTP {status}")
    } else {
        details.join("; ")
    }
}

/// A charge to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePayment {
    /// Single-use card token from the web SDK.
    pub source_id: String,
    /// Amount in cents.
    pub amount_cents: i64,
    pub currency: CurrencyCode,
    pub location_id: String,
    /// Fresh per request so a retried request cannot charge twice.
    pub idempotency_key: String,
    /// Capture immediately rather than authorize only.
    pub autocomplete: bool,
    pub note: String,
    pub buyer_email: Option<String>,
}

/// A payment as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: Option<DateTime<Utc>>,
    pub receipt_url: Option<String>,
}

/// External payment processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charge a card token.
    async fn create_payment(&self, request: &CreatePayment) -> Result<Payment, ProcessorError>;

    /// Fetch an existing payment.
    async fn get_payment(&self, payment_id: &str) -> Result<Payment, ProcessorError>;
}
