//! Cart commands.

use tire_disciples_core::TireId;
use tire_disciples_storefront::cart::QuantityChange;
use tracing::info;

use super::{CliError, Context};
use crate::terminal::Terminal;

/// Show the cart.
pub fn show(ctx: &Context) {
    ctx.open_cart(Terminal::new());
}

/// Add one of tire `id`.
///
/// # Errors
///
/// Returns [`CliError::UnknownTire`] if the catalog has no such tire.
pub fn add(ctx: &Context, id: i32) -> Result<(), CliError> {
    let mut cart = ctx.open_cart(Terminal::changes_only());
    if cart.add_item(TireId::new(id)) {
        Ok(())
    } else {
        Err(CliError::UnknownTire(id))
    }
}

/// Remove tire `id`'s line.
///
/// # Errors
///
/// Returns [`CliError::NotInCart`] if there is no such line.
pub fn remove(ctx: &Context, id: i32) -> Result<(), CliError> {
    let mut cart = ctx.open_cart(Terminal::changes_only());
    if cart.remove_item(TireId::new(id)) {
        Ok(())
    } else {
        Err(CliError::NotInCart(id))
    }
}

/// Change tire `id`'s quantity by `delta`.
///
/// # Errors
///
/// Returns [`CliError::NotInCart`] if there is no such line.
pub fn quantity(ctx: &Context, id: i32, delta: i64) -> Result<(), CliError> {
    let mut cart = ctx.open_cart(Terminal::changes_only());
    match cart.update_quantity(TireId::new(id), delta) {
        QuantityChange::Missing => Err(CliError::NotInCart(id)),
        QuantityChange::Removed => {
            info!("Removed tire {id} from the cart");
            Ok(())
        }
        QuantityChange::Updated(quantity) => {
            info!("Tire {id} quantity is now {quantity}");
            Ok(())
        }
    }
}

/// Empty the cart.
pub fn clear(ctx: &Context) {
    ctx.open_cart(Terminal::changes_only()).clear();
}
