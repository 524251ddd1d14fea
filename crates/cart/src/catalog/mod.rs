//! Catalog API: product records and stock levels.
//!
//! # Architecture
//!
//! - [`CatalogApi`] is the seam the cart manager depends on
//! - [`CatalogClient`] talks to the REST catalog over `reqwest`
//! - Product records are cached in memory via `moka`; stock never is
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` -> `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` -> `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::catalog::{CatalogApi, CatalogClient};
//!
//! let client = CatalogClient::new(&config.api)?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! let product = client.product(ProductId::new(1)).await?;
//! ```

mod cache;
mod client;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use client::CatalogClient;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API returned a record for a different product than requested.
    #[error("Requested product {requested}, API returned product {returned}")]
    UnexpectedProduct {
        requested: ProductId,
        returned: ProductId,
    },

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Remote product and stock lookups.
///
/// Implementations must not cache stock: every call reflects the inventory at
/// the time of the request.
pub trait CatalogApi: Send + Sync {
    /// Available stock for `product_id`.
    fn stock(&self, product_id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send;

    /// Full product record for `product_id`.
    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

impl<T: CatalogApi> CatalogApi for std::sync::Arc<T> {
    fn stock(&self, product_id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send {
        (**self).stock(product_id)
    }

    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).product(product_id)
    }
}
