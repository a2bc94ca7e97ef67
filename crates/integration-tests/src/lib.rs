//! Integration test harness for Tire Disciples.
//!
//! The relay router is built exactly as the binary builds it, minus Sentry,
//! with a [`FakeProcessor`] standing in for Square.
//!
//! # Test Categories
//!
//! - `payment_api` - Relay HTTP contract, driven in-process with `oneshot`
//! - `checkout_flow` - Storefront checkout over real HTTP against a spawned relay

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use chrono::{TimeZone, Utc};
use tire_disciples_api::config::AppEnvironment;
use tire_disciples_api::processor::{
    CreatePayment, Payment, PaymentProcessor, ProcessorError, SquareApiError,
};
use tire_disciples_api::state::AppState;

/// Location every test charge is booked against.
pub const TEST_LOCATION_ID: &str = "LTESTLOCATION";

/// Peer address of in-process requests.
pub const TEST_CLIENT_IP: &str = "203.0.113.10";

/// In-memory payment processor.
///
/// Charges succeed with `COMPLETED` unless [`FakeProcessor::decline_cards`]
/// is set. Every charge is recorded and can be looked up afterwards.
#[derive(Debug, Default)]
pub struct FakeProcessor {
    charges: Mutex<Vec<CreatePayment>>,
    payments: Mutex<HashMap<String, Payment>>,
    decline: AtomicBool,
}

impl FakeProcessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent charge fail with `CARD_DECLINED`.
    pub fn decline_cards(&self) {
        self.decline.store(true, Ordering::SeqCst);
    }

    /// Charges received so far.
    pub fn charges(&self) -> Vec<CreatePayment> {
        self.charges.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Seed a payment for lookup tests.
    pub fn insert_payment(&self, payment: Payment) {
        if let Ok(mut payments) = self.payments.lock() {
            payments.insert(payment.id.clone(), payment);
        }
    }
}

#[async_trait]
impl PaymentProcessor for FakeProcessor {
    async fn create_payment(&self, request: &CreatePayment) -> Result<Payment, ProcessorError> {
        if let Ok(mut charges) = self.charges.lock() {
            charges.push(request.clone());
        }

        if self.decline.load(Ordering::SeqCst) {
            return Err(ProcessorError::Api {
                status: 402,
                errors: vec![SquareApiError {
                    category: "PAYMENT_METHOD_ERROR".to_string(),
                    code: "CARD_DECLINED".to_string(),
                    detail: Some("Card declined.".to_string()),
                }],
            });
        }

        let count = self.charges.lock().map(|c| c.len()).unwrap_or_default();
        let id = format!("pay_test_{count}");
        let payment = Payment {
            id: id.clone(),
            status: "COMPLETED".to_string(),
            amount_cents: request.amount_cents,
            currency: request.currency.code().to_string(),
            created_at: Utc.timestamp_opt(1_760_886_245, 0).single(),
            receipt_url: Some(format!("https://squareup.com/receipt/preview/{id}")),
        };
        self.insert_payment(payment.clone());
        Ok(payment)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Payment, ProcessorError> {
        self.payments
            .lock()
            .ok()
            .and_then(|payments| payments.get(payment_id).cloned())
            .ok_or_else(|| ProcessorError::Api {
                status: 404,
                errors: vec![SquareApiError {
                    category: "INVALID_REQUEST_ERROR".to_string(),
                    code: "NOT_FOUND".to_string(),
                    detail: Some(format!("Could not find payment with id: {payment_id}")),
                }],
            })
    }
}

/// Build the relay router around `processor`, rate limited on the peer.
pub fn test_app(processor: Arc<FakeProcessor>, environment: AppEnvironment) -> Router {
    let state = AppState::new(processor, TEST_LOCATION_ID, environment);
    tire_disciples_api::app(state, None, false)
}

/// Build the relay router as deployed behind a proxy that sets
/// `X-Forwarded-For`.
pub fn test_app_behind_proxy(processor: Arc<FakeProcessor>) -> Router {
    let state = AppState::new(processor, TEST_LOCATION_ID, AppEnvironment::Production);
    tire_disciples_api::app(state, None, true)
}

/// Connection info for an in-process request from `ip`.
///
/// # Panics
///
/// Panics if `ip` is not an IP address.
pub fn peer(ip: &str) -> ConnectInfo<SocketAddr> {
    let ip = ip.parse().expect("Invalid test peer address");
    ConnectInfo(SocketAddr::new(ip, 51_000))
}

/// Serve the relay on an ephemeral local port and return its base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_api(processor: Arc<FakeProcessor>) -> String {
    let app = test_app(processor, AppEnvironment::Development);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    });

    format!("http://{addr}")
}

/// A base URL nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn dead_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{addr}")
}

/// A base URL that accepts connections and never answers.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn hung_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}
