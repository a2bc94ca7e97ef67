//! HTTP route handlers for the payment relay.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//!
//! # Card payments
//! POST /api/payments/process      - Charge a card token
//! GET  /api/payments/{payment_id} - Look up a payment
//!
//! # Cash orders
//! POST /api/orders/cash           - Log a cash-on-pickup/delivery order
//! ```

pub mod health;
pub mod orders;
pub mod payments;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/process", post(payments::process))
        .route("/{payment_id}", get(payments::show))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/cash", post(orders::cash))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/payments", payment_routes())
        .nest("/orders", order_routes())
}
