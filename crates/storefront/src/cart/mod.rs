//! Shopping cart.
//!
//! [`CartState`] holds the pure transitions and totals. [`Cart`] wraps it with
//! a [`CartStore`] and a list of [`CartObserver`]s: every mutation saves the
//! lines and then tells each observer to redraw.

mod render;
mod state;
mod store;

use std::sync::Arc;

use rust_decimal::Decimal;
use tire_disciples_core::{FulfillmentMethod, OrderItem, OrderTotals, TireId};

pub use render::{CartObserver, SnapshotObserver};
pub use state::{CartLine, CartState, CartSummary, DeliveryState, QuantityChange, TAX_RATE};
pub use store::{CartStore, JsonFileStore, MemoryStore, STORAGE_KEY, StoreError};

use crate::catalog::Catalog;
use crate::delivery::{
    DeliveryAddress, DeliveryError, DeliveryEstimator, DeliveryQuote, DistanceSampler,
};

/// One shopper's cart for the session.
pub struct Cart<S> {
    state: CartState,
    store: S,
    catalog: Arc<Catalog>,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<S: CartStore> Cart<S> {
    /// Restore the stored lines, or start empty.
    ///
    /// An unreadable record is logged and discarded.
    pub fn load(catalog: Arc<Catalog>, store: S) -> Self {
        let lines = match store.load() {
            Ok(lines) => lines.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored cart");
                Vec::new()
            }
        };

        Self {
            state: CartState::with_lines(lines),
            store,
            catalog,
            observers: Vec::new(),
        }
    }

    /// Register a renderer. It is drawn once immediately.
    pub fn subscribe(&mut self, mut observer: Box<dyn CartObserver>) {
        observer.cart_changed(&self.state.summary());
        self.observers.push(observer);
    }

    /// Add one unit of a catalog item. Unknown ids are ignored.
    ///
    /// Returns whether the item was found.
    pub fn add_item(&mut self, id: TireId) -> bool {
        let Some(item) = self.catalog.get(id) else {
            tracing::debug!(%id, "add_item: not in catalog");
            return false;
        };
        let quantity = self.state.add_item(item);
        tracing::debug!(%id, quantity, "added to cart");

        let message = format!("{} added to cart!", item.title);
        self.commit();
        for observer in &mut self.observers {
            observer.notify(&message);
        }
        true
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, id: TireId) -> bool {
        let removed = self.state.remove_item(id);
        self.commit();
        removed
    }

    /// Change a line's quantity by `delta`, removing it at zero.
    pub fn update_quantity(&mut self, id: TireId, delta: i64) -> QuantityChange {
        let change = self.state.update_quantity(id, delta);
        if change != QuantityChange::Missing {
            self.commit();
        }
        change
    }

    /// Empty the cart and reset delivery.
    pub fn clear(&mut self) {
        self.state.clear();
        self.commit();
    }

    pub fn set_fulfillment(&mut self, method: FulfillmentMethod) {
        self.state.set_fulfillment(method);
        self.commit();
    }

    pub fn apply_delivery_quote(&mut self, quote: &DeliveryQuote) {
        self.state.apply_delivery_quote(quote);
        self.commit();
    }

    /// Quote delivery to `address` and attach the result to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the address is incomplete; the cart is
    /// left untouched.
    pub fn calculate_delivery<R: DistanceSampler + ?Sized>(
        &mut self,
        estimator: &DeliveryEstimator,
        address: &DeliveryAddress,
        sampler: &mut R,
    ) -> Result<DeliveryQuote, DeliveryError> {
        let quote = estimator.quote(address, sampler)?;
        self.apply_delivery_quote(&quote);
        Ok(quote)
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    #[must_use]
    pub const fn fulfillment(&self) -> FulfillmentMethod {
        self.state.fulfillment()
    }

    #[must_use]
    pub const fn delivery(&self) -> &DeliveryState {
        self.state.delivery()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.state.subtotal()
    }

    #[must_use]
    pub fn delivery_fee(&self) -> Decimal {
        self.state.delivery_fee()
    }

    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.state.tax()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.total()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.item_count()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.state.summary()
    }

    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.state.order_items()
    }

    #[must_use]
    pub fn order_totals(&self) -> OrderTotals {
        self.state.order_totals()
    }

    /// Save the lines and redraw. Save failures are logged, never surfaced.
    fn commit(&mut self) {
        if let Err(e) = self.store.save(self.state.lines()) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
        let summary = self.state.summary();
        for observer in &mut self.observers {
            observer.cart_changed(&summary);
        }
    }
}

impl<S> std::fmt::Debug for Cart<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
