//! Checkout choice enums shared by the storefront and the payment relay.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMethod {
    /// Customer collects the tires.
    #[default]
    Pickup,
    /// Tires are driven to the customer's address for a fee.
    Delivery,
}

impl fmt::Display for FulfillmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Card tokenized by the payment SDK and charged through the relay.
    Card,
    /// Cash handed over at pickup.
    CashPickup,
    /// Cash handed over on delivery. Only valid with [`FulfillmentMethod::Delivery`].
    CashDelivery,
}

impl PaymentMethod {
    /// Whether this method is settled in cash.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::CashPickup | Self::CashDelivery)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::CashPickup => write!(f, "cash-pickup"),
            Self::CashDelivery => write!(f, "cash-delivery"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "cash-pickup" => Ok(Self::CashPickup),
            "cash-delivery" => Ok(Self::CashDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Status a logged cash order starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashOrderStatus {
    /// Waiting for the customer to collect and pay.
    PendingPickup,
    /// Waiting to be delivered and paid on arrival.
    PendingDelivery,
}

impl From<FulfillmentMethod> for CashOrderStatus {
    fn from(method: FulfillmentMethod) -> Self {
        match method {
            FulfillmentMethod::Pickup => Self::PendingPickup,
            FulfillmentMethod::Delivery => Self::PendingDelivery,
        }
    }
}
