//! Tire Disciples Storefront - Shopper-side logic.
//!
//! Everything the shop's front-end does short of drawing pixels: the catalog,
//! the persisted cart, the delivery estimate, and the checkout flows that hand
//! orders to the payment relay.
//!
//! # Modules
//!
//! - [`catalog`] - Read-only tire listings
//! - [`cart`] - Cart state, persistence and change notification
//! - [`delivery`] - Postal-code distance heuristic and fee schedule
//! - [`checkout`] - Card and cash checkout orchestration
//! - [`payments`] - Card SDK seam
//! - [`relay`] - HTTP client for the payment relay
//! - [`config`] - Environment configuration
//!
//! Rendering is pluggable: implement [`cart::CartObserver`] and
//! [`checkout::CheckoutView`] to draw the cart and checkout modal.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod delivery;
pub mod payments;
pub mod relay;
