//! What the checkout shows the shopper.
//!
//! [`CheckoutView`] is the rendering seam for the payment modal. The browser
//! drew into the DOM; here a terminal front-end or [`RecordingView`] stands in.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tire_disciples_core::{FulfillmentMethod, PaymentMethod};

use crate::cart::{CartLine, CartState};

/// Tone of a modal status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Pending,
}

/// Form fields the checkout may send focus to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DeliveryAddress,
}

/// Contents of the checkout modal when it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSummary {
    pub title: &'static str,
    pub payment: PaymentMethod,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    /// Present only for delivery orders.
    pub delivery_fee: Option<Decimal>,
    pub tax: Decimal,
    pub total: Decimal,
    /// Where the order will be handed over; cash orders only.
    pub location: Option<String>,
}

impl ModalSummary {
    pub(crate) fn new(cart: &CartState, payment: PaymentMethod) -> Self {
        let title = match payment {
            PaymentMethod::Card => "Complete Your Purchase",
            PaymentMethod::CashDelivery => "Cash on Delivery Order",
            PaymentMethod::CashPickup => "Cash at Pickup Order",
        };

        let delivery = cart.fulfillment() == FulfillmentMethod::Delivery;
        let location = payment.is_cash().then(|| {
            if payment == PaymentMethod::CashDelivery {
                let address = cart.delivery().address.as_deref().unwrap_or("your address");
                format!("We'll deliver to: {address}")
            } else {
                "We'll contact you to arrange pickup time and location".to_string()
            }
        });

        Self {
            title,
            payment,
            lines: cart.lines().to_vec(),
            subtotal: cart.subtotal(),
            delivery_fee: delivery.then(|| cart.delivery_fee()),
            tax: cart.tax(),
            total: cart.total(),
            location,
        }
    }
}

/// Rendering adapter for checkout.
pub trait CheckoutView: Send {
    /// Blocking message outside the modal.
    fn alert(&mut self, message: &str);
    fn focus(&mut self, field: FormField);
    fn open_modal(&mut self, summary: &ModalSummary);
    fn close_modal(&mut self);
    /// Status line inside the modal.
    fn show_status(&mut self, kind: StatusKind, message: &str);
    fn set_pay_enabled(&mut self, enabled: bool);
}

/// Something a [`RecordingView`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Alert(String),
    Focus(FormField),
    OpenModal(ModalSummary),
    CloseModal,
    Status(StatusKind, String),
    PayEnabled(bool),
}

/// View that records every call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Alerts in order.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// The last status line shown, if any.
    #[must_use]
    pub fn last_status(&self) -> Option<(StatusKind, String)> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Status(kind, msg) => Some((kind, msg)),
            _ => None,
        })
    }

    fn push(&self, event: ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CheckoutView for RecordingView {
    fn alert(&mut self, message: &str) {
        self.push(ViewEvent::Alert(message.to_string()));
    }

    fn focus(&mut self, field: FormField) {
        self.push(ViewEvent::Focus(field));
    }

    fn open_modal(&mut self, summary: &ModalSummary) {
        self.push(ViewEvent::OpenModal(summary.clone()));
    }

    fn close_modal(&mut self) {
        self.push(ViewEvent::CloseModal);
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        self.push(ViewEvent::Status(kind, message.to_string()));
    }

    fn set_pay_enabled(&mut self, enabled: bool) {
        self.push(ViewEvent::PayEnabled(enabled));
    }
}
