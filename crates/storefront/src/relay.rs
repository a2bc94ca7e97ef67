//! Client for the payment relay backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tire_disciples_core::{
    CashOrderRequest, CashOrderResponse, ErrorResponse, PaymentDetails, PaymentLookupResponse,
    ProcessPaymentRequest, ProcessPaymentResponse,
};
use url::Url;

/// Default limit on a whole relay request.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The relay answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A 2xx body that did not parse.
    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("invalid relay URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RelayError {
    /// Whether the relay may have acted on the request without telling us.
    ///
    /// True for network failures (timeouts included), 5xx responses and 2xx
    /// bodies that did not parse. A 4xx answer or a request that was never
    /// built is a definite failure.
    #[must_use]
    pub const fn is_unconfirmed(&self) -> bool {
        match self {
            Self::Network(_) | Self::Malformed(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::InvalidUrl(_) => false,
        }
    }
}

/// Operations the checkout needs from the relay.
#[async_trait]
pub trait OrderRelay: Send + Sync {
    /// `POST /api/payments/process`
    async fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse, RelayError>;

    /// `POST /api/orders/cash`
    async fn submit_cash_order(
        &self,
        request: &CashOrderRequest,
    ) -> Result<CashOrderResponse, RelayError>;

    /// `GET /api/payments/{id}`
    async fn payment_status(&self, payment_id: &str) -> Result<PaymentDetails, RelayError>;
}

/// [`OrderRelay`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRelay {
    /// Relay at `base_url`, such as `http://localhost:3001`. Requests that
    /// take longer than `timeout` fail with [`RelayError::Network`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client fails to
    /// build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let mut base_url = Url::parse(base_url)?;
        // Keep a trailing slash so `join` appends rather than replaces.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("tire-disciples/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn payment_url(&self, payment_id: &str) -> Result<Url, RelayError> {
        let mut url = self.base_url.join("api/payments")?;
        url.path_segments_mut()
            .map_err(|()| RelayError::Malformed("relay URL cannot be a base".to_string()))?
            .push(payment_id);
        Ok(url)
    }
}

/// Decode a relay response, turning non-2xx statuses into
/// [`RelayError::Rejected`] with the body's `error` text.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RelayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(RelayError::Rejected {
            status: status.as_u16(),
            message: rejection_message(status, &body),
        });
    }

    serde_json::from_str(&body).map_err(|e| RelayError::Malformed(e.to_string()))
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

#[async_trait]
impl OrderRelay for HttpRelay {
    #[tracing::instrument(skip_all, fields(amount = ?request.amount, items = request.items.len()))]
    async fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse, RelayError> {
        let url = self.base_url.join("api/payments/process")?;
        let response = self.client.post(url).json(request).send().await?;
        read_json(response).await
    }

    #[tracing::instrument(skip_all, fields(items = request.items.as_ref().map_or(0, Vec::len)))]
    async fn submit_cash_order(
        &self,
        request: &CashOrderRequest,
    ) -> Result<CashOrderResponse, RelayError> {
        let url = self.base_url.join("api/orders/cash")?;
        let response = self.client.post(url).json(request).send().await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn payment_status(&self, payment_id: &str) -> Result<PaymentDetails, RelayError> {
        let url = self.payment_url(payment_id)?;
        let response = self.client.get(url).send().await?;
        let lookup: PaymentLookupResponse = read_json(response).await?;
        Ok(lookup.payment)
    }
}
