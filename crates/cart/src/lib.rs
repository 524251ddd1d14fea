//! RocketShoes cart library.
//!
//! A shopping-cart state manager for the storefront: add and remove items,
//! adjust quantities, persist the cart to a key-value store, and validate
//! every change against the catalog's stock endpoint.
//!
//! # Architecture
//!
//! - [`manager::CartManager`] owns the cart and runs the three operations
//! - [`catalog::CatalogApi`] looks up products and stock (HTTP via `reqwest`)
//! - [`storage::KeyValueStore`] persists the JSON snapshot
//! - [`notify::Notifier`] shows toasts when an operation fails
//!
//! The manager is generic over its collaborators and is passed explicitly
//! to every consumer that needs it.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartManager, TracingNotifier};
//! use rocketshoes_core::ProductId;
//!
//! let config = CartConfig::from_env()?;
//! let cart = CartManager::from_config(&config, TracingNotifier).await?;
//!
//! cart.add_product(ProductId::new(1)).await?;
//! cart.update_product_amount(ProductId::new(1), 3).await?;
//! println!("{} items", cart.summary().total_quantity);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod notify;
pub mod storage;

pub use catalog::{ApiError, CatalogApi, CatalogClient};
pub use config::{CartConfig, CatalogApiConfig, ConfigError};
pub use error::{CartError, CartOperation};
pub use manager::CartManager;
pub use notify::{BroadcastNotifier, Level, MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
