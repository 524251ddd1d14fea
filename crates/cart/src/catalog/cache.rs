//! Cache types for catalog API responses.

use rocketshoes_core::{Product, ProductId};

/// Cache key for catalog records.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
}
