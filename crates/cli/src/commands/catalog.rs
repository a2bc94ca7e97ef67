//! List the catalog.

use tracing::info;

use super::Context;
use crate::terminal::money;

/// Print every tire for sale.
pub fn list(ctx: &Context) {
    if ctx.catalog.is_empty() {
        info!("No tires listed");
        return;
    }

    for item in ctx.catalog.iter() {
        info!(
            "#{} {} | {} | {} tread | {} old | {} | {}",
            item.id,
            item.title,
            item.size,
            item.tread,
            item.age,
            item.condition,
            money(item.price.amount())
        );
    }
}
