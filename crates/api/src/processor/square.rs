//! Square Payments API client.
//!
//! Only the two calls the relay needs: `POST /v2/payments` and
//! `GET /v2/payments/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{CreatePayment, Payment, PaymentProcessor, ProcessorError};
use crate::config::SquareConfig;

/// Square API version pinned for every request.
pub const SQUARE_API_VERSION: &str = "2025-01-23";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of Square's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareApiError {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Money {
    amount: i64,
    currency: String,
}

#[derive(Debug, Serialize)]
struct CreatePaymentBody<'a> {
    source_id: &'a str,
    idempotency_key: &'a str,
    amount_money: Money,
    location_id: &'a str,
    autocomplete: bool,
    note: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    buyer_email_address: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PaymentEnvelope {
    payment: SquarePayment,
}

#[derive(Debug, Deserialize)]
struct SquarePayment {
    id: String,
    status: String,
    amount_money: Money,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    receipt_url: Option<String>,
}

impl From<SquarePayment> for Payment {
    fn from(p: SquarePayment) -> Self {
        Self {
            id: p.id,
            status: p.status,
            amount_cents: p.amount_money.amount,
            currency: p.amount_money.currency,
            created_at: p.created_at,
            receipt_url: p.receipt_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<SquareApiError>,
}

/// Square REST client.
#[derive(Debug, Clone)]
pub struct SquareClient {
    client: reqwest::Client,
    base_url: Url,
}

impl SquareClient {
    /// Create a client for the configured Square environment.
    ///
    /// # Errors
    ///
    /// Returns error if the access token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &SquareConfig) -> Result<Self, ProcessorError> {
        Self::with_base_url(config, config.environment.base_url())
    }

    /// Create a client against an explicit API root.
    ///
    /// # Errors
    ///
    /// Returns error if the URL or access token is invalid, or the HTTP client
    /// fails to build.
    pub fn with_base_url(config: &SquareConfig, base_url: &str) -> Result<Self, ProcessorError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.access_token.expose_secret()
        ))
        .map_err(|e| ProcessorError::Config(format!("Invalid access token format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Square-Version", HeaderValue::from_static(SQUARE_API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(CONNECT_TIMEOUT))
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| ProcessorError::Config(format!("Invalid API URL: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ProcessorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProcessorError::Config("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_payment(response: reqwest::Response) -> Result<Payment, ProcessorError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
            return Err(ProcessorError::Api {
                status: status.as_u16(),
                errors: envelope.errors,
            });
        }

        serde_json::from_str::<PaymentEnvelope>(&body)
            .map(|envelope| envelope.payment.into())
            .map_err(|e| ProcessorError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PaymentProcessor for SquareClient {
    #[tracing::instrument(skip_all, fields(amount_cents = request.amount_cents))]
    async fn create_payment(&self, request: &CreatePayment) -> Result<Payment, ProcessorError> {
        let body = CreatePaymentBody {
            source_id: &request.source_id,
            idempotency_key: &request.idempotency_key,
            amount_money: Money {
                amount: request.amount_cents,
                currency: request.currency.code().to_string(),
            },
            location_id: &request.location_id,
            autocomplete: request.autocomplete,
            note: &request.note,
            buyer_email_address: request.buyer_email.as_deref(),
        };

        let url = self.url(&["v2", "payments"])?;
        let response = self.client.post(url).json(&body).send().await?;
        Self::read_payment(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_payment(&self, payment_id: &str) -> Result<Payment, ProcessorError> {
        let url = self.url(&["v2", "payments", payment_id])?;
        let response = self.client.get(url).send().await?;
        Self::read_payment(response).await
    }
}
