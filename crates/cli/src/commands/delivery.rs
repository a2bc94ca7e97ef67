//! Delivery quotes.

use tire_disciples_storefront::delivery::{DeliveryAddress, DeliveryError};
use tracing::info;

use super::Context;
use crate::terminal::money;

/// Quote delivery to `address` without touching the cart.
///
/// # Errors
///
/// Returns [`DeliveryError`] if the address is incomplete.
pub fn quote(ctx: &Context, address: &DeliveryAddress) -> Result<(), DeliveryError> {
    let quote = ctx.config.estimator.quote(address, &mut rand::rng())?;

    info!("Delivery to {}", quote.address);
    info!("  Estimated distance: {} miles", quote.distance);
    info!("  Delivery fee:       {}", money(quote.fee));
    Ok(())
}
