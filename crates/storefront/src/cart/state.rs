//! Pure cart state transitions and totals.
//!
//! Nothing here persists or renders. [`super::Cart`] wraps this state with a
//! store and observers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tire_disciples_core::price::round_cents;
use tire_disciples_core::{FulfillmentMethod, OrderItem, OrderTotals, TireId};

use crate::catalog::CatalogItem;
use crate::delivery::DeliveryQuote;

/// Sales tax applied to items plus delivery (7%).
pub const TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// One distinct tire in the cart.
///
/// Catalog fields are copied when the line is created and never re-synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: TireId,
    pub title: String,
    pub size: String,
    pub tread: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            size: item.size.clone(),
            tread: item.tread.clone(),
            price: item.price.amount(),
            quantity: 1,
            image: item.cover_photo().map(str::to_owned),
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Delivery quote state attached to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryState {
    pub fee: Decimal,
    pub distance: Decimal,
    pub address: Option<String>,
    /// True once checkout may proceed: pickup, or delivery with a quote.
    pub calculated: bool,
}

impl DeliveryState {
    fn for_method(method: FulfillmentMethod) -> Self {
        Self {
            calculated: method == FulfillmentMethod::Pickup,
            ..Self::default()
        }
    }
}

/// Result of [`CartState::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line with that id.
    Missing,
    /// Quantity dropped to zero or below; the line is gone.
    Removed,
    /// New quantity.
    Updated(u32),
}

/// Everything a renderer needs after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub fulfillment: FulfillmentMethod,
    pub item_count: u32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Ordered line items plus fulfillment and delivery state.
///
/// Invariants: line ids are unique and every quantity is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    fulfillment: FulfillmentMethod,
    delivery: DeliveryState,
}

impl Default for CartState {
    fn default() -> Self {
        Self::with_lines(Vec::new())
    }
}

impl CartState {
    /// Start from previously stored lines.
    ///
    /// Stored data is untrusted: duplicate ids are merged (first position wins)
    /// and zero-quantity lines dropped so the invariants hold.
    #[must_use]
    pub fn with_lines(stored: Vec<CartLine>) -> Self {
        let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
        for line in stored {
            if line.quantity == 0 {
                continue;
            }
            if let Some(existing) = lines.iter_mut().find(|l| l.id == line.id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                lines.push(line);
            }
        }

        let fulfillment = FulfillmentMethod::default();
        Self {
            lines,
            fulfillment,
            delivery: DeliveryState::for_method(fulfillment),
        }
    }

    /// Add one unit of a catalog item, creating the line if needed.
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, item: &CatalogItem) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == item.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::from_catalog(item));
        1
    }

    /// Remove a line. Returns whether one was removed.
    pub fn remove_item(&mut self, id: TireId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    /// Add `delta` to a line's quantity, removing it at zero or below.
    pub fn update_quantity(&mut self, id: TireId, delta: i64) -> QuantityChange {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return QuantityChange::Missing;
        };

        let next = i64::from(line.quantity).saturating_add(delta);
        if next <= 0 {
            self.remove_item(id);
            return QuantityChange::Removed;
        }

        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        QuantityChange::Updated(line.quantity)
    }

    /// Drop every line and reset delivery state.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.delivery = DeliveryState::for_method(self.fulfillment);
    }

    /// Switch between pickup and delivery.
    ///
    /// Pickup zeroes the fee and counts as calculated. Switching to delivery
    /// requires a fresh quote.
    pub fn set_fulfillment(&mut self, method: FulfillmentMethod) {
        if method == self.fulfillment && self.delivery.calculated {
            return;
        }
        let address = self.delivery.address.take();
        self.fulfillment = method;
        self.delivery = DeliveryState {
            address,
            ..DeliveryState::for_method(method)
        };
    }

    /// Record a delivery quote. Implies delivery fulfillment.
    pub fn apply_delivery_quote(&mut self, quote: &DeliveryQuote) {
        self.fulfillment = FulfillmentMethod::Delivery;
        self.delivery = DeliveryState {
            fee: quote.fee,
            distance: quote.distance,
            address: Some(quote.address.clone()),
            calculated: true,
        };
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub const fn fulfillment(&self) -> FulfillmentMethod {
        self.fulfillment
    }

    #[must_use]
    pub const fn delivery(&self) -> &DeliveryState {
        &self.delivery
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Delivery fee currently applied (zero for pickup).
    #[must_use]
    pub fn delivery_fee(&self) -> Decimal {
        match self.fulfillment {
            FulfillmentMethod::Pickup => Decimal::ZERO,
            FulfillmentMethod::Delivery => self.delivery.fee,
        }
    }

    /// Tax on subtotal plus delivery, rounded to cents.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        round_cents((self.subtotal() + self.delivery_fee()) * TAX_RATE)
    }

    /// Subtotal plus delivery plus tax.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.delivery_fee() + self.tax()
    }

    /// Number of tires across all lines, for the badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, l| count.saturating_add(l.quantity))
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.clone(),
            fulfillment: self.fulfillment,
            item_count: self.item_count(),
            subtotal: self.subtotal(),
            delivery_fee: self.delivery_fee(),
            tax: self.tax(),
            total: self.total(),
        }
    }

    /// Line snapshot in the relay's wire shape.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|l| OrderItem {
                name: l.title.clone(),
                size: l.size.clone(),
                tread: l.tread.clone(),
                price: l.price,
                quantity: l.quantity,
            })
            .collect()
    }

    /// Totals in the relay's wire shape.
    #[must_use]
    pub fn order_totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal(),
            delivery_fee: (self.fulfillment == FulfillmentMethod::Delivery)
                .then(|| self.delivery_fee()),
            tax: self.tax(),
            total: self.total(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tire_disciples_core::Price;

    use super::*;

    fn tire(id: i32, price: &str) -> CatalogItem {
        CatalogItem {
            id: TireId::new(id),
            title: format!("Tire {id}"),
            size: "275/60R20".to_string(),
            tread: "70%".to_string(),
            age: "22 weeks".to_string(),
            condition: "USED".to_string(),
            price: price.parse::<Price>().unwrap(),
            photos: vec![format!("https://img.example/{id}.jpg")],
        }
    }

    fn quote(distance: Decimal, fee: Decimal) -> DeliveryQuote {
        DeliveryQuote {
            distance,
            fee,
            address: "1 Main St, Denver, CO 80210".to_string(),
        }
    }

    #[test]
    fn test_repeat_add_keeps_single_line() {
        let item = tire(1, "$170.00");
        let mut state = CartState::default();
        for _ in 0..5 {
            state.add_item(&item);
        }

        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.lines()[0].quantity, 5);
        assert_eq!(state.item_count(), 5);
    }

    #[test]
    fn test_add_copies_catalog_fields() {
        let mut state = CartState::default();
        assert_eq!(state.add_item(&tire(4, "$89.99")), 1);
        let line = state.lines()[0].clone();

        assert_eq!(line.title, "Tire 4");
        assert_eq!(line.price, Decimal::new(8999, 2));
        assert_eq!(line.image.as_deref(), Some("https://img.example/4.jpg"));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut state = CartState::default();
        state.add_item(&tire(3, "10"));
        state.add_item(&tire(1, "10"));
        state.add_item(&tire(3, "10"));

        let ids: Vec<i32> = state.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_pickup_scenario_totals() {
        let item = tire(1, "$170.00");
        let mut state = CartState::default();
        state.add_item(&item);
        state.add_item(&item);

        assert_eq!(state.subtotal(), Decimal::new(34000, 2));
        assert_eq!(state.tax(), Decimal::new(2380, 2));
        assert_eq!(state.total(), Decimal::new(36380, 2));
    }

    #[test]
    fn test_tax_includes_delivery_fee() {
        let mut state = CartState::default();
        state.add_item(&tire(1, "$170.00"));
        state.add_item(&tire(1, "$170.00"));
        state.apply_delivery_quote(&quote(Decimal::new(453, 1), Decimal::new(906, 1)));

        // (340.00 + 90.60) * 0.07 = 30.142 -> 30.14
        assert_eq!(state.delivery_fee(), Decimal::new(9060, 2));
        assert_eq!(state.tax(), Decimal::new(3014, 2));
        assert_eq!(state.total(), Decimal::new(46074, 2));
        assert_eq!(
            state.order_totals().delivery_fee,
            Some(Decimal::new(906, 1))
        );
    }

    #[test]
    fn test_update_quantity_to_zero_matches_remove() {
        let mut removed = CartState::default();
        removed.add_item(&tire(1, "10"));
        removed.add_item(&tire(2, "20"));
        let mut updated = removed.clone();
        updated.update_quantity(TireId::new(1), 1);

        assert!(removed.remove_item(TireId::new(1)));
        assert_eq!(
            updated.update_quantity(TireId::new(1), -2),
            QuantityChange::Removed
        );
        assert_eq!(removed, updated);
    }

    #[test]
    fn test_update_quantity_missing_and_positive() {
        let mut state = CartState::default();
        state.add_item(&tire(1, "10"));

        assert_eq!(
            state.update_quantity(TireId::new(9), 1),
            QuantityChange::Missing
        );
        assert_eq!(
            state.update_quantity(TireId::new(1), 3),
            QuantityChange::Updated(4)
        );
        assert_eq!(state.subtotal(), Decimal::new(40, 0));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut state = CartState::default();
        state.add_item(&tire(1, "10"));
        assert!(!state.remove_item(TireId::new(2)));
        assert_eq!(state.lines().len(), 1);
    }

    #[test]
    fn test_switching_to_delivery_requires_quote() {
        let mut state = CartState::default();
        assert!(state.delivery().calculated);

        state.set_fulfillment(FulfillmentMethod::Delivery);
        assert!(!state.delivery().calculated);

        state.apply_delivery_quote(&quote(Decimal::new(30, 0), Decimal::new(60, 0)));
        assert!(state.delivery().calculated);

        state.set_fulfillment(FulfillmentMethod::Pickup);
        assert_eq!(state.delivery_fee(), Decimal::ZERO);
        assert!(state.delivery().calculated);

        state.set_fulfillment(FulfillmentMethod::Delivery);
        assert!(!state.delivery().calculated);
        assert_eq!(state.delivery_fee(), Decimal::ZERO);
    }

    #[test]
    fn test_clear_resets_delivery() {
        let mut state = CartState::default();
        state.add_item(&tire(1, "10"));
        state.apply_delivery_quote(&quote(Decimal::new(5, 0), Decimal::new(10, 0)));
        state.clear();

        assert!(state.is_empty());
        assert_eq!(state.fulfillment(), FulfillmentMethod::Delivery);
        assert!(!state.delivery().calculated);
        assert_eq!(state.total(), Decimal::ZERO);
    }

    #[test]
    fn test_with_lines_restores_invariants() {
        let mut a = CartLine::from_catalog(&tire(1, "10"));
        a.quantity = 2;
        let mut b = CartLine::from_catalog(&tire(2, "20"));
        b.quantity = 0;
        let mut c = CartLine::from_catalog(&tire(1, "10"));
        c.quantity = 3;

        let state = CartState::with_lines(vec![a, b, c]);
        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.lines()[0].quantity, 5);
    }

    #[test]
    fn test_order_items_snapshot() {
        let mut state = CartState::default();
        state.add_item(&tire(1, "$170.00"));
        let items = state.order_items();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tire 1");
        assert_eq!(items[0].quantity, 1);
        assert!(state.order_totals().delivery_fee.is_none());
    }
}
