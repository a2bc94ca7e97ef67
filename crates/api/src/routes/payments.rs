//! Card payment route handlers.
//!
//! Card tokens are charged through the configured [`PaymentProcessor`]
//! (Square in production).
//!
//! [`PaymentProcessor`]: crate::processor::PaymentProcessor

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use tire_disciples_core::{
    CurrencyCode, OrderItem, PaymentDetails, PaymentLookupResponse, ProcessPaymentRequest,
    ProcessPaymentResponse,
    price::{from_minor_units, to_minor_units},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::processor::CreatePayment;
use crate::state::AppState;

/// Summarize the order lines for the processor's payment note.
#[must_use]
pub fn payment_note(items: &[OrderItem]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{} ({}) x{}", item.name, item.size, item.quantity))
        .collect();
    format!("Tire Order: {}", lines.join(", "))
}

/// Validate the request and turn it into a processor charge.
fn build_charge(request: ProcessPaymentRequest, location_id: &str) -> Result<CreatePayment> {
    let source_id = request.source_id.filter(|s| !s.trim().is_empty());
    let amount = request.amount.filter(|a| !a.is_zero());

    let (Some(source_id), Some(amount)) = (source_id, amount) else {
        return Err(AppError::BadRequest(
            "Missing required payment information".to_string(),
        ));
    };

    let amount_cents = to_minor_units(amount)
        .filter(|cents| *cents > 0 && amount > Decimal::ZERO)
        .ok_or_else(|| AppError::BadRequest("Invalid payment amount".to_string()))?;

    let buyer_email = request
        .customer
        .as_ref()
        .map(|c| c.email.trim())
        .filter(|email| !email.is_empty())
        .map(String::from);

    Ok(CreatePayment {
        source_id,
        amount_cents,
        currency: CurrencyCode::USD,
        location_id: location_id.to_string(),
        idempotency_key: Uuid::new_v4().to_string(),
        autocomplete: true,
        note: payment_note(&request.items),
        buyer_email,
    })
}

/// Charge a card token.
///
/// POST /api/payments/process
#[instrument(skip_all)]
pub async fn process(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProcessPaymentRequest>, JsonRejection>,
) -> Result<Json<ProcessPaymentResponse>> {
    let Json(request) = payload?;
    let customer = request
        .customer
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let items = request.items.len();

    let charge = build_charge(request, state.location_id())?;

    tracing::info!(
        amount_cents = charge.amount_cents,
        items,
        customer = %customer,
        "Processing card payment"
    );

    let payment = state
        .processor()
        .create_payment(&charge)
        .await
        .map_err(AppError::Payment)?;

    tracing::info!(
        payment_id = %payment.id,
        status = %payment.status,
        "Payment created"
    );

    Ok(Json(ProcessPaymentResponse {
        success: true,
        payment_id: payment.id,
        status: payment.status,
        receipt_url: payment.receipt_url,
        message: "Payment processed successfully".to_string(),
    }))
}

/// Look up a payment by processor ID.
///
/// GET /api/payments/{payment_id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentLookupResponse>> {
    let payment = state
        .processor()
        .get_payment(&payment_id)
        .await
        .map_err(AppError::PaymentLookup)?;

    Ok(Json(PaymentLookupResponse {
        success: true,
        payment: PaymentDetails {
            id: payment.id,
            status: payment.status,
            amount: from_minor_units(payment.amount_cents),
            currency: payment.currency,
            created_at: payment.created_at,
            receipt_url: payment.receipt_url,
        },
    }))
}
