//! Cash order route handlers.
//!
//! Cash orders are not persisted: the relay assigns an ID, writes the order to
//! the log for staff to pick up, and acknowledges it.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tire_disciples_core::{
    CashOrderRequest, CashOrderResponse, CashOrderStatus, Customer, CustomerContact,
    FulfillmentMethod, OrderItem, OrderTotals,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The order as written to the log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoggedCashOrder<'a> {
    order_id: &'a str,
    customer: &'a Customer,
    items: &'a [OrderItem],
    totals: &'a OrderTotals,
    order_date: DateTime<Utc>,
    payment_method: &'static str,
    status: CashOrderStatus,
    fulfillment: FulfillmentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivery_address: Option<&'a str>,
}

/// `CASH-<unix millis>`.
#[must_use]
pub fn cash_order_id(now: DateTime<Utc>) -> String {
    format!("CASH-{}", now.timestamp_millis())
}

/// Log a cash order.
///
/// POST /api/orders/cash
#[instrument(skip_all)]
pub async fn cash(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CashOrderRequest>, JsonRejection>,
) -> Result<Json<CashOrderResponse>> {
    let Json(request) = payload?;

    let (Some(customer), Some(items), Some(totals)) =
        (request.customer, request.items, request.totals)
    else {
        return Err(AppError::BadRequest(
            "Missing required order information".to_string(),
        ));
    };
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required order information".to_string(),
        ));
    }

    let now = Utc::now();
    let order_id = cash_order_id(now);
    let fulfillment = request.fulfillment.unwrap_or_default();

    let order = LoggedCashOrder {
        order_id: &order_id,
        customer: &customer,
        items: &items,
        totals: &totals,
        order_date: request.order_date.unwrap_or(now),
        payment_method: "cash",
        status: CashOrderStatus::from(fulfillment),
        fulfillment,
        delivery_address: request
            .delivery_address
            .as_deref()
            .filter(|_| fulfillment == FulfillmentMethod::Delivery),
    };

    let record = serde_json::to_string(&order).map_err(|e| AppError::CashOrder {
        details: state.is_development().then(|| e.to_string()),
    })?;

    tracing::info!(
        order_id = %order_id,
        total = %totals.total,
        items = items.len(),
        order = %record,
        "Cash order received"
    );

    Ok(Json(CashOrderResponse {
        success: true,
        order_id,
        message: "Cash order received successfully".to_string(),
        customer: CustomerContact {
            name: customer.name,
            phone: customer.phone,
        },
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cash_order_id_uses_unix_millis() {
        let now = Utc.timestamp_millis_opt(1_760_886_245_123).unwrap();
        assert_eq!(cash_order_id(now), "CASH-1760886245123");
    }

    #[test]
    fn test_logged_order_shape() {
        let customer = Customer {
            name: "Sam Ortiz".to_string(),
            email: "sam@example.com".to_string(),
            phone: "720-555-0142".to_string(),
            notes: String::new(),
        };
        let totals = OrderTotals {
            subtotal: Decimal::new(17000, 2),
            delivery_fee: Some(Decimal::new(5000, 2)),
            tax: Decimal::new(1275, 2),
            total: Decimal::new(23275, 2),
        };
        let order = LoggedCashOrder {
            order_id: "CASH-1",
            customer: &customer,
            items: &[],
            totals: &totals,
            order_date: Utc.timestamp_millis_opt(0).unwrap(),
            payment_method: "cash",
            status: CashOrderStatus::PendingDelivery,
            fulfillment: FulfillmentMethod::Delivery,
            delivery_address: Some("1600 Pennsylvania Ave, Denver, CO 80203"),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "CASH-1");
        assert_eq!(json["paymentMethod"], "cash");
        assert_eq!(json["status"], "pending_delivery");
        assert_eq!(json["fulfillment"], "delivery");
        assert_eq!(json["totals"]["deliveryFee"], 50.0);
        assert_eq!(json["deliveryAddress"], "1600 Pennsylvania Ave, Denver, CO 80203");
    }
}
