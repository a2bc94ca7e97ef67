//! Checkout orchestration.
//!
//! [`Checkout::begin`] runs the pre-flight checks and opens the modal without
//! touching the network. The card flow then attaches a card input through the
//! [`PaymentSdk`] and submits a token; the cash flow submits the order
//! directly. The cart is cleared only once the relay confirms, or when a cash
//! order's outcome is unknown and [`CashFailurePolicy::AssumeSuccess`] is set.
//!
//! Submissions take `&mut self`, so a second submit cannot start while one is
//! in flight; the view's pay control is disabled for the duration as well.

mod contact;
mod view;

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tire_disciples_core::{
    CashOrderRequest, Customer, FulfillmentMethod, PaymentMethod, ProcessPaymentRequest,
    ProcessPaymentResponse,
};

pub use contact::{ContactError, ContactForm};
pub use view::{CheckoutView, FormField, ModalSummary, RecordingView, StatusKind, ViewEvent};

use crate::cart::{Cart, CartStore};
use crate::payments::{CardTokenizer, MerchantIds, PaymentSdk, SdkError, TokenizeError};
use crate::relay::{OrderRelay, RelayError};

/// Support line quoted in failure messages.
pub const DEFAULT_SUPPORT_PHONE: &str = "(303) 895-7849";

/// What to do when a cash order's submission fails without a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CashFailurePolicy {
    /// Treat the order as received: clear the cart and thank the shopper.
    #[default]
    AssumeSuccess,
    /// Keep the cart and tell the shopper the order is unconfirmed.
    ReportPending,
}

impl FromStr for CashFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assume-success" => Ok(Self::AssumeSuccess),
            "report-pending" => Ok(Self::ReportPending),
            other => Err(format!(
                "unknown cash failure policy {other:?} (expected assume-success or report-pending)"
            )),
        }
    }
}

/// Knobs for [`Checkout`].
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Merchant the card SDK is bound to. `None` disables card payments.
    pub merchant: Option<MerchantIds>,
    pub support_phone: String,
    pub cash_failure_policy: CashFailurePolicy,
    /// Pause between the success message and clearing the cart.
    pub card_success_delay: Duration,
    pub cash_success_delay: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            merchant: None,
            support_phone: DEFAULT_SUPPORT_PHONE.to_string(),
            cash_failure_policy: CashFailurePolicy::default(),
            card_success_delay: Duration::from_secs(3),
            cash_success_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Please calculate delivery fee before proceeding to checkout.")]
    DeliveryNotCalculated,
    #[error(
        "Cash on Delivery is only available for delivery orders. Please select \"Delivery\" or choose a different payment method."
    )]
    CashOnDeliveryRequiresDelivery,
    #[error("no checkout is open for this payment method")]
    NotOpen,
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Sdk(#[from] SdkError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    /// The cash order may or may not have reached the relay.
    #[error("order could not be confirmed: {0}")]
    Unconfirmed(#[source] RelayError),
}

/// Result of a cash order submission that cleared the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CashOrderOutcome {
    /// The relay logged the order.
    Confirmed { order_id: String },
    /// Submission failed; treated as received under
    /// [`CashFailurePolicy::AssumeSuccess`].
    Unconfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Card,
    Cash(PaymentMethod),
}

/// Drives one order at a time from modal to confirmation.
#[derive(Debug)]
pub struct Checkout<R, V> {
    relay: R,
    view: V,
    settings: CheckoutSettings,
    stage: Stage,
}

impl<R: OrderRelay, V: CheckoutView> Checkout<R, V> {
    pub const fn new(relay: R, view: V, settings: CheckoutSettings) -> Self {
        Self {
            relay,
            view,
            settings,
            stage: Stage::Idle,
        }
    }

    #[must_use]
    pub const fn relay(&self) -> &R {
        &self.relay
    }

    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub const fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Whether a modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stage != Stage::Idle
    }

    /// Validate the cart for `payment` and open the checkout modal.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`],
    /// [`CheckoutError::DeliveryNotCalculated`] or
    /// [`CheckoutError::CashOnDeliveryRequiresDelivery`]; each is also shown
    /// to the shopper as an alert.
    pub fn begin<S: CartStore>(
        &mut self,
        cart: &Cart<S>,
        payment: PaymentMethod,
    ) -> Result<ModalSummary, CheckoutError> {
        self.check_cart(cart, payment)?;

        let summary = ModalSummary::new(cart.state(), payment);
        self.view.open_modal(&summary);
        self.view.set_pay_enabled(true);
        self.stage = if payment.is_cash() {
            Stage::Cash(payment)
        } else {
            Stage::Card
        };
        tracing::info!(%payment, total = %summary.total, "checkout opened");
        Ok(summary)
    }

    /// Attach a card input for the open card checkout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotOpen`] outside a card checkout, or
    /// [`CheckoutError::Sdk`] if the SDK cannot be initialized.
    pub async fn open_card_payment<P: PaymentSdk>(
        &mut self,
        sdk: &P,
    ) -> Result<P::Card, CheckoutError> {
        if self.stage != Stage::Card {
            return Err(CheckoutError::NotOpen);
        }

        let attached = match &self.settings.merchant {
            Some(merchant) => sdk.attach_card(merchant).await,
            None => Err(SdkError::NotConfigured),
        };

        attached.map_err(|e| {
            tracing::error!(error = %e, "payment SDK initialization failed");
            self.view.set_pay_enabled(false);
            self.show_failure(&e);
            CheckoutError::Sdk(e)
        })
    }

    /// Tokenize the card and charge the cart total.
    ///
    /// # Errors
    ///
    /// Any failure leaves the cart untouched and the pay control enabled.
    #[tracing::instrument(skip_all, fields(total = %cart.total()))]
    pub async fn submit_card_payment<S: CartStore, C: CardTokenizer>(
        &mut self,
        cart: &mut Cart<S>,
        card: &mut C,
        contact: &ContactForm,
    ) -> Result<ProcessPaymentResponse, CheckoutError> {
        if self.stage != Stage::Card {
            return Err(CheckoutError::NotOpen);
        }
        self.check_cart(cart, PaymentMethod::Card)?;
        let customer = self.validate_contact(contact)?;

        self.view.set_pay_enabled(false);
        self.view.show_status(StatusKind::Pending, "Processing...");

        let token = match card.tokenize().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "card tokenization failed");
                self.view.show_status(StatusKind::Error, &e.user_message());
                self.view.set_pay_enabled(true);
                return Err(e.into());
            }
        };

        let request = ProcessPaymentRequest {
            source_id: Some(token),
            amount: Some(cart.total()),
            customer: Some(customer),
            items: cart.order_items(),
        };

        match self.relay.process_payment(&request).await {
            Ok(response) => {
                tracing::info!(payment_id = %response.payment_id, status = %response.status, "card payment confirmed");
                self.view
                    .show_status(StatusKind::Success, "Payment successful! Order confirmed.");
                tokio::time::sleep(self.settings.card_success_delay).await;
                cart.clear();
                self.finish();
                self.view
                    .alert("Order confirmed! Check your email for details.");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "card payment failed");
                self.show_failure(&e);
                self.view.set_pay_enabled(true);
                Err(e.into())
            }
        }
    }

    /// Send the open cash order to the relay.
    ///
    /// # Errors
    ///
    /// The cart is re-checked as in [`Checkout::begin`], since fulfillment
    /// may have changed while the modal was open. Validation failures and
    /// definite relay failures always keep the cart. Failures the relay may
    /// have acted on follow [`CheckoutSettings::cash_failure_policy`].
    #[tracing::instrument(skip_all, fields(total = %cart.total()))]
    pub async fn submit_cash_order<S: CartStore>(
        &mut self,
        cart: &mut Cart<S>,
        contact: &ContactForm,
    ) -> Result<CashOrderOutcome, CheckoutError> {
        let Stage::Cash(payment) = self.stage else {
            return Err(CheckoutError::NotOpen);
        };
        self.check_cart(cart, payment)?;
        let customer = self.validate_contact(contact)?;
        let phone = customer.phone.clone();
        let handover = if payment == PaymentMethod::CashDelivery {
            "delivery"
        } else {
            "pickup"
        };

        self.view.set_pay_enabled(false);
        self.view.show_status(StatusKind::Pending, "Processing...");

        let fulfillment = cart.fulfillment();
        let request = CashOrderRequest {
            customer: Some(customer),
            items: Some(cart.order_items()),
            totals: Some(cart.order_totals()),
            order_date: Some(Utc::now()),
            fulfillment: Some(fulfillment),
            delivery_address: (fulfillment == FulfillmentMethod::Delivery)
                .then(|| cart.delivery().address.clone())
                .flatten(),
        };

        let outcome = match self.relay.submit_cash_order(&request).await {
            Ok(response) => {
                tracing::info!(order_id = %response.order_id, "cash order confirmed");
                self.view.show_status(
                    StatusKind::Success,
                    &format!("Order confirmed! We'll contact you shortly to arrange {handover}."),
                );
                CashOrderOutcome::Confirmed {
                    order_id: response.order_id,
                }
            }
            Err(e) if !e.is_unconfirmed() => {
                tracing::warn!(error = %e, "cash order rejected");
                self.show_failure(&e);
                self.view.set_pay_enabled(true);
                return Err(e.into());
            }
            Err(e) => match self.settings.cash_failure_policy {
                CashFailurePolicy::AssumeSuccess => {
                    tracing::warn!(error = %e, "cash order unconfirmed, assuming received");
                    self.view.show_status(
                        StatusKind::Success,
                        &format!(
                            "Order received! We'll contact you at {phone} to arrange {handover}."
                        ),
                    );
                    CashOrderOutcome::Unconfirmed
                }
                CashFailurePolicy::ReportPending => {
                    tracing::warn!(error = %e, "cash order unconfirmed, keeping cart");
                    self.view.show_status(
                        StatusKind::Pending,
                        &format!(
                            "We couldn't confirm your order. Your cart has been kept; please try again or call us at {}.",
                            self.settings.support_phone
                        ),
                    );
                    self.view.set_pay_enabled(true);
                    return Err(CheckoutError::Unconfirmed(e));
                }
            },
        };

        tokio::time::sleep(self.settings.cash_success_delay).await;
        cart.clear();
        self.finish();
        if matches!(outcome, CashOrderOutcome::Confirmed { .. }) {
            self.view.alert(&format!(
                "Order confirmed! Check your email for details. We'll contact you at {phone} to arrange {handover}."
            ));
        }
        Ok(outcome)
    }

    /// Dismiss the modal without submitting.
    pub fn close(&mut self) {
        if self.stage != Stage::Idle {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.view.close_modal();
        self.stage = Stage::Idle;
    }

    /// Refuse orders the cart cannot support, alerting the shopper.
    fn check_cart<S: CartStore>(
        &mut self,
        cart: &Cart<S>,
        payment: PaymentMethod,
    ) -> Result<(), CheckoutError> {
        let delivery = cart.fulfillment() == FulfillmentMethod::Delivery;

        let blocked = if cart.is_empty() {
            CheckoutError::EmptyCart
        } else if delivery && !cart.delivery().calculated {
            CheckoutError::DeliveryNotCalculated
        } else if payment == PaymentMethod::CashDelivery && !delivery {
            CheckoutError::CashOnDeliveryRequiresDelivery
        } else {
            return Ok(());
        };

        self.view.alert(&blocked.to_string());
        if matches!(blocked, CheckoutError::DeliveryNotCalculated) {
            self.view.focus(FormField::DeliveryAddress);
        }
        tracing::debug!(%payment, error = %blocked, "checkout blocked");
        Err(blocked)
    }

    fn validate_contact(&mut self, contact: &ContactForm) -> Result<Customer, CheckoutError> {
        contact.validate().map_err(|e| {
            self.view.show_status(StatusKind::Error, &e.to_string());
            e.into()
        })
    }

    fn show_failure(&mut self, reason: &dyn std::fmt::Display) {
        let message = format!(
            "Error: {reason}. Please contact us at {}.",
            self.settings.support_phone
        );
        self.view.show_status(StatusKind::Error, &message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use tire_disciples_core::{CashOrderResponse, CustomerContact, PaymentDetails, TireId};

    use super::*;
    use crate::cart::MemoryStore;
    use crate::catalog::Catalog;
    use crate::delivery::DeliveryQuote;
    use crate::payments::PresetCardSdk;

    /// Relay double that records requests and fails with a fixed status.
    #[derive(Default)]
    struct FakeRelay {
        fail_status: Option<u16>,
        malformed: bool,
        payments: Mutex<Vec<ProcessPaymentRequest>>,
        cash: Mutex<Vec<CashOrderRequest>>,
    }

    impl FakeRelay {
        fn failing(status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.payments.lock().unwrap().len() + self.cash.lock().unwrap().len()
        }

        fn failure(&self, message: &str) -> Result<(), RelayError> {
            match self.fail_status {
                Some(status) => Err(RelayError::Rejected {
                    status,
                    message: message.to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl OrderRelay for FakeRelay {
        async fn process_payment(
            &self,
            request: &ProcessPaymentRequest,
        ) -> Result<ProcessPaymentResponse, RelayError> {
            self.payments.lock().unwrap().push(request.clone());
            self.failure("Payment processing failed")?;
            Ok(ProcessPaymentResponse {
                success: true,
                payment_id: "pay_123".to_string(),
                status: "COMPLETED".to_string(),
                receipt_url: None,
                message: "Payment processed successfully".to_string(),
            })
        }

        async fn submit_cash_order(
            &self,
            request: &CashOrderRequest,
        ) -> Result<CashOrderResponse, RelayError> {
            self.cash.lock().unwrap().push(request.clone());
            self.failure("Failed to process cash order")?;
            if self.malformed {
                return Err(RelayError::Malformed("missing field `orderId`".to_string()));
            }
            let customer = request.customer.clone().unwrap_or_default();
            Ok(CashOrderResponse {
                success: true,
                order_id: "CASH-1700000000000".to_string(),
                message: "Order received successfully".to_string(),
                customer: CustomerContact {
                    name: customer.name,
                    phone: customer.phone,
                },
            })
        }

        async fn payment_status(&self, _payment_id: &str) -> Result<PaymentDetails, RelayError> {
            Err(RelayError::Malformed("not used".to_string()))
        }
    }

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            merchant: Some(MerchantIds {
                application_id: "sq0idp-test".to_string(),
                location_id: "LTEST".to_string(),
            }),
            card_success_delay: Duration::ZERO,
            cash_success_delay: Duration::ZERO,
            ..CheckoutSettings::default()
        }
    }

    fn checkout(relay: FakeRelay) -> (Checkout<FakeRelay, RecordingView>, RecordingView) {
        checkout_with(relay, settings())
    }

    fn checkout_with(
        relay: FakeRelay,
        settings: CheckoutSettings,
    ) -> (Checkout<FakeRelay, RecordingView>, RecordingView) {
        let view = RecordingView::new();
        (Checkout::new(relay, view.clone(), settings), view)
    }

    fn cart_with_two() -> Cart<MemoryStore> {
        let mut cart = Cart::load(Arc::new(Catalog::builtin().unwrap()), MemoryStore::new());
        cart.add_item(TireId::new(1));
        cart.add_item(TireId::new(1));
        cart
    }

    fn contact() -> ContactForm {
        ContactForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "303-555-0100".to_string(),
            notes: "Afternoons only".to_string(),
        }
    }

    fn delivery_quote() -> DeliveryQuote {
        DeliveryQuote {
            distance: Decimal::new(453, 1),
            fee: Decimal::new(906, 1),
            address: "1600 Glenarm Pl, Denver, CO 80202".to_string(),
        }
    }

    #[test]
    fn test_empty_cart_rejected_before_network() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let cart = Cart::load(Arc::new(Catalog::builtin().unwrap()), MemoryStore::new());

        for payment in [
            PaymentMethod::Card,
            PaymentMethod::CashPickup,
            PaymentMethod::CashDelivery,
        ] {
            assert!(matches!(
                checkout.begin(&cart, payment),
                Err(CheckoutError::EmptyCart)
            ));
        }
        assert_eq!(view.alerts().len(), 3);
        assert_eq!(view.alerts()[0], "Your cart is empty!");
        assert_eq!(checkout.relay().calls(), 0);
        assert!(!checkout.is_open());
    }

    #[test]
    fn test_delivery_requires_quote_and_focuses_address() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();
        cart.set_fulfillment(FulfillmentMethod::Delivery);

        assert!(matches!(
            checkout.begin(&cart, PaymentMethod::Card),
            Err(CheckoutError::DeliveryNotCalculated)
        ));
        assert!(view.events().contains(&ViewEvent::Focus(FormField::DeliveryAddress)));
        assert!(!checkout.is_open());
    }

    #[test]
    fn test_cash_on_delivery_needs_delivery() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let cart = cart_with_two();

        assert!(matches!(
            checkout.begin(&cart, PaymentMethod::CashDelivery),
            Err(CheckoutError::CashOnDeliveryRequiresDelivery)
        ));
        assert!(view.alerts()[0].starts_with("Cash on Delivery is only available"));
        assert_eq!(checkout.relay().calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_begin() {
        let (mut checkout, _view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();

        assert!(matches!(
            checkout.submit_cash_order(&mut cart, &contact()).await,
            Err(CheckoutError::NotOpen)
        ));
        assert!(matches!(
            checkout.open_card_payment(&PresetCardSdk::new(None)).await,
            Err(CheckoutError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_card_payment_clears_cart() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::Card).unwrap();
        let sdk = PresetCardSdk::new(Some("cnon:card-nonce-ok".to_string()));
        let mut card = checkout.open_card_payment(&sdk).await.unwrap();
        let response = checkout
            .submit_card_payment(&mut cart, &mut card, &contact())
            .await
            .unwrap();

        assert_eq!(response.payment_id, "pay_123");
        assert!(cart.is_empty());
        assert!(!checkout.is_open());

        let sent = checkout.relay().payments.lock().unwrap()[0].clone();
        assert_eq!(sent.source_id.as_deref(), Some("cnon:card-nonce-ok"));
        assert_eq!(sent.amount, Some(Decimal::new(36380, 2)));
        assert_eq!(sent.items[0].quantity, 2);
        assert_eq!(sent.customer.unwrap().notes, "Afternoons only");

        assert!(view.events().contains(&ViewEvent::Status(
            StatusKind::Success,
            "Payment successful! Order confirmed.".to_string()
        )));
        assert_eq!(
            view.alerts(),
            vec!["Order confirmed! Check your email for details."]
        );
    }

    #[tokio::test]
    async fn test_card_relay_failure_keeps_cart() {
        let (mut checkout, view) = checkout(FakeRelay::failing(500));
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::Card).unwrap();
        let sdk = PresetCardSdk::new(Some("cnon:card-nonce-declined".to_string()));
        let mut card = checkout.open_card_payment(&sdk).await.unwrap();
        let err = checkout
            .submit_card_payment(&mut cart, &mut card, &contact())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Relay(_)));
        assert_eq!(cart.item_count(), 2);
        assert!(checkout.is_open());
        assert_eq!(
            view.last_status(),
            Some((
                StatusKind::Error,
                "Error: Payment processing failed. Please contact us at (303) 895-7849.".to_string()
            ))
        );
        assert_eq!(view.events().last(), Some(&ViewEvent::PayEnabled(true)));
    }

    #[tokio::test]
    async fn test_tokenize_failure_skips_relay() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::Card).unwrap();
        let mut card = checkout
            .open_card_payment(&PresetCardSdk::new(None))
            .await
            .unwrap();
        let err = checkout
            .submit_card_payment(&mut cart, &mut card, &contact())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Tokenize(_)));
        assert_eq!(checkout.relay().calls(), 0);
        assert_eq!(
            view.last_status().unwrap().1,
            "Card details are required"
        );
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_contact_skips_relay() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();
        let mut form = contact();
        form.email = "jane.example.com".to_string();

        checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
        let err = checkout.submit_cash_order(&mut cart, &form).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Contact(ContactError::InvalidEmail)
        ));
        assert_eq!(checkout.relay().calls(), 0);
        assert_eq!(
            view.last_status().unwrap().1,
            "Please enter a valid email address."
        );
    }

    #[tokio::test]
    async fn test_missing_merchant_ids() {
        let mut unconfigured = settings();
        unconfigured.merchant = None;
        let (mut checkout, view) = checkout_with(FakeRelay::default(), unconfigured);
        let cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::Card).unwrap();
        let err = checkout
            .open_card_payment(&PresetCardSdk::new(Some("tok".to_string())))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Sdk(SdkError::NotConfigured)));
        assert_eq!(
            view.last_status().unwrap().1,
            "Error: Payment system is not configured. Please contact us at (303) 895-7849."
        );
    }

    #[tokio::test]
    async fn test_cash_delivery_confirmed() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();
        cart.apply_delivery_quote(&delivery_quote());

        let summary = checkout.begin(&cart, PaymentMethod::CashDelivery).unwrap();
        assert_eq!(summary.total, Decimal::new(46074, 2));

        let outcome = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap();
        assert_eq!(
            outcome,
            CashOrderOutcome::Confirmed {
                order_id: "CASH-1700000000000".to_string()
            }
        );
        assert!(cart.is_empty());

        let sent = checkout.relay().cash.lock().unwrap()[0].clone();
        let totals = sent.totals.unwrap();
        assert_eq!(totals.delivery_fee, Some(Decimal::new(906, 1)));
        assert_eq!(totals.total, Decimal::new(46074, 2));
        assert_eq!(sent.fulfillment, Some(FulfillmentMethod::Delivery));
        assert_eq!(
            sent.delivery_address.as_deref(),
            Some("1600 Glenarm Pl, Denver, CO 80202")
        );
        assert!(sent.order_date.is_some());

        assert!(view.events().contains(&ViewEvent::Status(
            StatusKind::Success,
            "Order confirmed! We'll contact you shortly to arrange delivery.".to_string()
        )));
    }

    #[tokio::test]
    async fn test_cash_failure_assumes_success_by_default() {
        let (mut checkout, view) = checkout(FakeRelay::failing(503));
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
        let outcome = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap();

        assert_eq!(outcome, CashOrderOutcome::Unconfirmed);
        assert!(cart.is_empty());
        assert_eq!(
            view.last_status(),
            Some((
                StatusKind::Success,
                "Order received! We'll contact you at 303-555-0100 to arrange pickup.".to_string()
            ))
        );
        assert!(view.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_cash_failure_report_pending_keeps_cart() {
        let mut honest = settings();
        honest.cash_failure_policy = CashFailurePolicy::ReportPending;
        let (mut checkout, view) = checkout_with(FakeRelay::failing(503), honest);
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
        let err = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Unconfirmed(_)));
        assert_eq!(cart.item_count(), 2);
        assert!(checkout.is_open());
        assert_eq!(view.last_status().unwrap().0, StatusKind::Pending);
    }

    #[tokio::test]
    async fn test_cash_rejection_always_surfaced() {
        for policy in [CashFailurePolicy::AssumeSuccess, CashFailurePolicy::ReportPending] {
            let mut s = settings();
            s.cash_failure_policy = policy;
            let (mut checkout, view) = checkout_with(FakeRelay::failing(400), s);
            let mut cart = cart_with_two();

            checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
            let err = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap_err();

            assert!(matches!(err, CheckoutError::Relay(_)), "{policy:?}");
            assert!(!cart.is_empty());
            assert_eq!(view.last_status().unwrap().0, StatusKind::Error);
        }
    }

    #[tokio::test]
    async fn test_switch_to_pickup_after_begin_blocks_cash_on_delivery() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();
        cart.apply_delivery_quote(&delivery_quote());

        checkout.begin(&cart, PaymentMethod::CashDelivery).unwrap();
        cart.set_fulfillment(FulfillmentMethod::Pickup);
        let err = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::CashOnDeliveryRequiresDelivery));
        assert_eq!(checkout.relay().calls(), 0);
        assert_eq!(cart.item_count(), 2);
        assert!(checkout.is_open());
        assert!(view.alerts()[0].starts_with("Cash on Delivery is only available"));
    }

    #[tokio::test]
    async fn test_switch_to_unquoted_delivery_after_begin_blocks_card() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::Card).unwrap();
        let sdk = PresetCardSdk::new(Some("cnon:card-nonce-ok".to_string()));
        let mut card = checkout.open_card_payment(&sdk).await.unwrap();
        cart.set_fulfillment(FulfillmentMethod::Delivery);
        let err = checkout
            .submit_card_payment(&mut cart, &mut card, &contact())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::DeliveryNotCalculated));
        assert_eq!(checkout.relay().calls(), 0);
        assert!(view.events().contains(&ViewEvent::Focus(FormField::DeliveryAddress)));
    }

    #[tokio::test]
    async fn test_malformed_cash_confirmation_follows_policy() {
        let relay = FakeRelay {
            malformed: true,
            ..FakeRelay::default()
        };
        let (mut checkout, _view) = checkout(relay);
        let mut cart = cart_with_two();

        checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
        let outcome = checkout.submit_cash_order(&mut cart, &contact()).await.unwrap();

        assert_eq!(outcome, CashOrderOutcome::Unconfirmed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_close_resets_stage() {
        let (mut checkout, view) = checkout(FakeRelay::default());
        let cart = cart_with_two();
        checkout.begin(&cart, PaymentMethod::CashPickup).unwrap();
        checkout.close();
        checkout.close();

        assert!(!checkout.is_open());
        let closes = view
            .events()
            .iter()
            .filter(|e| **e == ViewEvent::CloseModal)
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "report-pending".parse::<CashFailurePolicy>().unwrap(),
            CashFailurePolicy::ReportPending
        );
        assert_eq!(
            " Assume-Success ".parse::<CashFailurePolicy>().unwrap(),
            CashFailurePolicy::AssumeSuccess
        );
        assert!("lenient".parse::<CashFailurePolicy>().is_err());
    }
}
