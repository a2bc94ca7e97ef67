//! Tire Disciples CLI - Drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse and fill the cart
//! td-cli catalog
//! td-cli cart add 1
//! td-cli cart qty 1 +1
//!
//! # Quote delivery
//! td-cli delivery quote --street "1600 Champa St" --city Denver --state CO --zip 80202
//!
//! # Check out (cash at pickup)
//! td-cli checkout --payment cash-pickup --name "Jane Doe" --email jane@example.com --phone 303-555-0100
//!
//! # Check out by card, with a sandbox nonce standing in for the card form
//! td-cli checkout --payment card --card-token cnon:card-nonce-ok \
//!     --name "Jane Doe" --email jane@example.com --phone 303-555-0100
//!
//! # Look up a payment
//! td-cli payment R2B3Z8WMVt3EAmzYWLZvz7Y69EbZY
//! ```
//!
//! # Commands
//!
//! - `catalog` - List tires for sale
//! - `cart` - Show or change the cart
//! - `delivery quote` - Estimate a delivery fee
//! - `checkout` - Place an order
//! - `payment` - Look up a card payment

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tire_disciples_core::PaymentMethod;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "td-cli")]
#[command(author, version, about = "Tire Disciples storefront CLI")]
struct Cli {
    /// Catalog JSON file (defaults to the built-in listing)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tires for sale
    Catalog,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Delivery fee estimates
    Delivery {
        #[command(subcommand)]
        action: DeliveryAction,
    },
    /// Place an order for the current cart
    Checkout(CheckoutArgs),
    /// Look up a card payment through the relay
    Payment {
        /// Processor payment ID
        payment_id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one of a tire
    Add { id: i32 },
    /// Remove a tire line
    Remove { id: i32 },
    /// Change a line's quantity by a signed amount
    Qty {
        id: i32,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum DeliveryAction {
    /// Estimate the delivery fee for an address
    Quote(AddressArgs),
}

#[derive(Args, Clone)]
struct AddressArgs {
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: Option<String>,
}

#[derive(Args)]
struct CheckoutArgs {
    /// `card`, `cash-pickup` or `cash-delivery`
    #[arg(long)]
    payment: PaymentMethod,

    /// Deliver instead of pickup (requires the address flags)
    #[arg(long)]
    delivery: bool,

    #[command(flatten)]
    address: AddressArgs,

    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value = "")]
    notes: String,

    /// Card nonce from the payment form (card payments only)
    #[arg(long)]
    card_token: Option<String>,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "tire_disciples_storefront=info,tire_disciples_cli=info,td_cli=info".into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::load(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Catalog => commands::catalog::list(&ctx),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { id } => commands::cart::add(&ctx, id)?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, id)?,
            CartAction::Qty { id, delta } => commands::cart::quantity(&ctx, id, delta)?,
            CartAction::Clear => commands::cart::clear(&ctx),
        },
        Commands::Delivery { action } => match action {
            DeliveryAction::Quote(address) => commands::delivery::quote(&ctx, &address.into())?,
        },
        Commands::Checkout(args) => commands::checkout::run(&ctx, args).await?,
        Commands::Payment { payment_id } => commands::payment::show(&ctx, &payment_id).await?,
    }
    Ok(())
}

impl From<AddressArgs> for tire_disciples_storefront::delivery::DeliveryAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            street: args.street.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
            state: args.state.unwrap_or_default(),
            postal_code: args.zip.unwrap_or_default(),
        }
    }
}
