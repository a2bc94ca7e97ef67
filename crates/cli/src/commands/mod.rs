//! Command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod delivery;
pub mod payment;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tire_disciples_storefront::cart::{Cart, JsonFileStore};
use tire_disciples_storefront::catalog::Catalog;
use tire_disciples_storefront::config::StorefrontConfig;

use crate::terminal::Terminal;

/// Errors specific to the CLI surface.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No tire with id {0} in the catalog")]
    UnknownTire(i32),
    #[error("Tire {0} is not in your cart")]
    NotInCart(i32),
}

/// What every command needs: configuration and the catalog.
pub struct Context {
    pub config: StorefrontConfig,
    pub catalog: Arc<Catalog>,
}

impl Context {
    /// Load configuration and the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is invalid or the catalog cannot
    /// be read.
    pub fn load(catalog_path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_env()?;
        let catalog = match catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        tracing::debug!(items = catalog.len(), cart = %config.cart_path.display(), "context loaded");

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
        })
    }

    /// Open the persisted cart with a terminal renderer attached.
    pub fn open_cart(&self, renderer: Terminal) -> Cart<JsonFileStore> {
        let store = JsonFileStore::new(self.config.cart_path.clone());
        let mut cart = Cart::load(Arc::clone(&self.catalog), store);
        cart.subscribe(Box::new(renderer));
        cart
    }
}
