//! Tire Disciples Core - Shared types library.
//!
//! This crate provides common types used across all Tire Disciples components:
//! - `storefront` - Shopper-side cart, delivery estimate and checkout
//! - `api` - Payment relay service (card payments and cash orders)
//! - `cli` - Terminal front-end for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! types in [`types::order`] are the JSON contract between the storefront and
//! the payment relay, so both sides serialize through the same definitions.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails, checkout enums,
//!   and relay request/response bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
