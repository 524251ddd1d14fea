//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by the cart library and its front
//! ends:
//! - `cart` - Cart manager, catalog client, stores and notifiers
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. Cart invariants (one entry per product, amounts of at least
//! one, insertion order) are enforced here so every layer shares them.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, prices, products, stock, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
