//! Place an order for the persisted cart.

use tire_disciples_core::{FulfillmentMethod, PaymentMethod};
use tire_disciples_storefront::checkout::{CashOrderOutcome, Checkout, ContactForm};
use tire_disciples_storefront::payments::PresetCardSdk;
use tire_disciples_storefront::relay::HttpRelay;
use tracing::info;

use super::Context;
use crate::CheckoutArgs;
use crate::terminal::Terminal;

/// Run the checkout for `args.payment`.
///
/// # Errors
///
/// Returns the first failure: address, cart pre-flight, contact validation,
/// card tokenization, or the relay.
pub async fn run(ctx: &Context, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = ctx.open_cart(Terminal::changes_only());

    if args.delivery {
        cart.set_fulfillment(FulfillmentMethod::Delivery);
        cart.calculate_delivery(
            &ctx.config.estimator,
            &args.address.into(),
            &mut rand::rng(),
        )?;
    }

    let relay = HttpRelay::new(&ctx.config.api_url, ctx.config.relay_timeout)?;
    let mut checkout = Checkout::new(relay, Terminal::new(), ctx.config.checkout_settings());
    checkout.begin(&cart, args.payment)?;

    let contact = ContactForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        notes: args.notes,
    };

    if args.payment == PaymentMethod::Card {
        let sdk = PresetCardSdk::new(args.card_token);
        let mut card = checkout.open_card_payment(&sdk).await?;
        let response = checkout
            .submit_card_payment(&mut cart, &mut card, &contact)
            .await?;
        if let Some(receipt_url) = response.receipt_url {
            info!("Receipt: {receipt_url}");
        }
    } else {
        match checkout.submit_cash_order(&mut cart, &contact).await? {
            CashOrderOutcome::Confirmed { order_id } => info!("Order number: {order_id}"),
            CashOrderOutcome::Unconfirmed => info!("Order submitted without a confirmation number"),
        }
    }

    Ok(())
}
