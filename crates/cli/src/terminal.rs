//! Terminal rendering for the cart and checkout.
//!
//! Output goes through `tracing` like the rest of the tool, so it respects
//! `RUST_LOG` and stays off stdout.

use rust_decimal::Decimal;
use tire_disciples_storefront::cart::{CartObserver, CartSummary};
use tire_disciples_storefront::checkout::{CheckoutView, FormField, ModalSummary, StatusKind};
use tracing::{debug, error, info, warn};

/// `$170.00`
pub fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Renders cart summaries and checkout prompts to the log.
#[derive(Debug, Default)]
pub struct Terminal {
    skip_next_render: bool,
}

impl Terminal {
    /// Render every summary, including the one sent on subscription.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the subscription render; only show the cart after it changes.
    #[must_use]
    pub const fn changes_only() -> Self {
        Self {
            skip_next_render: true,
        }
    }
}

impl CartObserver for Terminal {
    fn cart_changed(&mut self, summary: &CartSummary) {
        if std::mem::take(&mut self.skip_next_render) {
            return;
        }

        if summary.is_empty() {
            info!("Your cart is empty");
            return;
        }

        info!("Cart ({} tires, {})", summary.item_count, summary.fulfillment);
        for line in &summary.lines {
            info!(
                "  #{} {} ({}, {} tread) x{}  {}",
                line.id,
                line.title,
                line.size,
                line.tread,
                line.quantity,
                money(line.line_total())
            );
        }
        info!("  Subtotal:     {}", money(summary.subtotal));
        info!("  Delivery:     {}", money(summary.delivery_fee));
        info!("  Tax:          {}", money(summary.tax));
        info!("  Total:        {}", money(summary.total));
    }

    fn notify(&mut self, message: &str) {
        info!("{message}");
    }
}

impl CheckoutView for Terminal {
    fn alert(&mut self, message: &str) {
        warn!("{message}");
    }

    fn focus(&mut self, field: FormField) {
        match field {
            FormField::DeliveryAddress => {
                info!("Pass --delivery with --street, --city and --zip to quote delivery");
            }
        }
    }

    fn open_modal(&mut self, summary: &ModalSummary) {
        info!("{}", summary.title);
        for line in &summary.lines {
            info!("  {} ({}) x{}  {}", line.title, line.size, line.quantity, money(line.line_total()));
        }
        info!("  Subtotal:     {}", money(summary.subtotal));
        if let Some(fee) = summary.delivery_fee {
            info!("  Delivery:     {}", money(fee));
        }
        info!("  Tax:          {}", money(summary.tax));
        info!("  Total:        {}", money(summary.total));
        if let Some(location) = &summary.location {
            info!("{location}");
        }
    }

    fn close_modal(&mut self) {
        debug!("checkout closed");
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Error => error!("{message}"),
            StatusKind::Success | StatusKind::Pending => info!("{message}"),
        }
    }

    fn set_pay_enabled(&mut self, enabled: bool) {
        debug!(enabled, "pay control");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_pads_cents() {
        assert_eq!(money(Decimal::new(170, 0)), "$170.00");
        assert_eq!(money(Decimal::new(18190, 2)), "$181.90");
    }
}
