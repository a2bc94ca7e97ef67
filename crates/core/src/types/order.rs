//! JSON bodies exchanged between the storefront and the payment relay.
//!
//! Field names are camelCase on the wire. Money travels as JSON numbers in
//! dollars and is held as [`Decimal`] on both sides.
//!
//! Request fields the relay must validate itself (rather than have the JSON
//! extractor reject) are `Option`s, so a missing field becomes a 400 with a
//! readable message instead of a deserialization failure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::FulfillmentMethod;

/// Customer contact details collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// One line of an order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub size: String,
    pub tread: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// Order totals in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_fee: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// `POST /api/payments/process` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    /// Single-use card token from the payment SDK.
    #[serde(default)]
    pub source_id: Option<String>,
    /// Charge amount in dollars.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// `POST /api/payments/process` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponse {
    pub success: bool,
    pub payment_id: String,
    pub status: String,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Payment as reported by `GET /api/payments/:paymentId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub id: String,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

/// `GET /api/payments/:paymentId` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLookupResponse {
    pub success: bool,
    pub payment: PaymentDetails,
}

/// `POST /api/orders/cash` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CashOrderRequest {
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub totals: Option<OrderTotals>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<FulfillmentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

/// The contact subset echoed back for a cash order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
}

/// `POST /api/orders/cash` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOrderResponse {
    pub success: bool,
    pub order_id: String,
    #[serde(default)]
    pub message: String,
    pub customer: CustomerContact,
}

/// Error body returned by every relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_payment_request_uses_camel_case_numbers() {
        let request = ProcessPaymentRequest {
            source_id: Some("cnon:card-nonce-ok".to_string()),
            amount: Some(Decimal::new(36380, 2)),
            customer: Some(Customer {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                phone: "303-555-0100".to_string(),
                notes: String::new(),
            }),
            items: vec![OrderItem {
                name: "Continental CrossContact LX 20".to_string(),
                size: "275/60R20".to_string(),
                tread: "70%".to_string(),
                price: Decimal::new(170, 0),
                quantity: 2,
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sourceId"], "cnon:card-nonce-ok");
        assert_eq!(value["amount"], json!(363.8));
        assert_eq!(value["items"][0]["price"], json!(170.0));
        assert_eq!(value["customer"]["notes"], "");
    }

    #[test]
    fn test_missing_payment_fields_deserialize_as_none() {
        let request: ProcessPaymentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.source_id.is_none());
        assert!(request.amount.is_none());
        assert!(request.items.is_empty());
    }

    #[test]
    fn test_cash_order_request_accepts_browser_shape() {
        let body = json!({
            "paymentMethod": "cash",
            "customer": {"name": "Dana", "email": "dana@example.com", "phone": "303"},
            "items": [{"name": "Tire", "size": "275/60R20", "tread": "70%", "price": 170, "quantity": 1}],
            "totals": {"subtotal": 170, "tax": 11.9, "total": 181.9},
            "orderDate": "2026-10-19T16:00:00Z"
        });

        let request: CashOrderRequest = serde_json::from_value(body).unwrap();
        let totals = request.totals.unwrap();
        assert_eq!(totals.total, Decimal::new(1819, 1));
        assert!(totals.delivery_fee.is_none());
        assert_eq!(request.customer.unwrap().notes, "");
        assert!(request.order_date.is_some());
    }

    #[test]
    fn test_error_response_omits_missing_details() {
        let body = ErrorResponse {
            error: "Internal server error".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Internal server error"})
        );
    }
}
