//! Payment lookup.

use tire_disciples_storefront::relay::{HttpRelay, OrderRelay, RelayError};
use tracing::info;

use super::Context;
use crate::terminal::money;

/// Look up a card payment through the relay.
///
/// # Errors
///
/// Returns [`RelayError`] if the relay is unreachable or the lookup fails.
pub async fn show(ctx: &Context, payment_id: &str) -> Result<(), RelayError> {
    let relay = HttpRelay::new(&ctx.config.api_url, ctx.config.relay_timeout)?;
    let payment = relay.payment_status(payment_id).await?;

    info!("Payment {}", payment.id);
    info!("  Status:   {}", payment.status);
    info!("  Amount:   {} {}", money(payment.amount), payment.currency);
    if let Some(created_at) = payment.created_at {
        info!("  Created:  {}", created_at.to_rfc3339());
    }
    if let Some(receipt_url) = &payment.receipt_url {
        info!("  Receipt:  {receipt_url}");
    }
    Ok(())
}
