//! Cart operation errors and the user-facing messages they map to.
//!
//! Every failed operation is reported twice: the caller gets a `CartError`,
//! and the user gets a toast whose text never exposes the root cause.

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::catalog::ApiError;
use crate::storage::StorageError;

/// Toast shown when the requested amount exceeds the available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Quantidade solicitada fora de estoque";

/// Error type for cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested amount exceeds the available stock.
    #[error("Out of stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The operation referenced a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotFound(ProductId),

    /// A catalog lookup failed.
    #[error("Catalog error: {0}")]
    Api(#[from] ApiError),

    /// The cart snapshot could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A mutation would have broken a cart invariant.
    #[error("Cart invariant violated: {0}")]
    Invariant(#[from] CartInvariantError),

    /// The cart already holds as many units as can be represented.
    #[error("Amount overflow for product {0}")]
    AmountOverflow(ProductId),
}

impl CartError {
    /// Whether this is an out-of-stock rejection.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock { .. })
    }
}

/// The three cart operations, for logging and toast selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Generic toast for a failure that is not an out-of-stock rejection.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::AddProduct => "Erro na adição do produto",
            Self::RemoveProduct => "Erro na remoção do produto",
            Self::UpdateProductAmount => "Erro na alteração de quantidade do produto",
        }
    }

    /// Toast for `error` raised by this operation.
    #[must_use]
    pub const fn message_for(self, error: &CartError) -> &'static str {
        if error.is_out_of_stock() {
            OUT_OF_STOCK_MESSAGE
        } else {
            self.failure_message()
        }
    }

    /// Name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddProduct => "add_product",
            Self::RemoveProduct => "remove_product",
            Self::UpdateProductAmount => "update_product_amount",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn out_of_stock() -> CartError {
        CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 4,
            available: 3,
        }
    }

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            out_of_stock().to_string(),
            "Out of stock for product 1: requested 4, available 3"
        );
        assert_eq!(
            CartError::ProductNotFound(ProductId::new(7)).to_string(),
            "Product 7 is not in the cart"
        );
    }

    #[test]
    fn test_out_of_stock_message_for_every_operation() {
        for op in [
            CartOperation::AddProduct,
            CartOperation::RemoveProduct,
            CartOperation::UpdateProductAmount,
        ] {
            assert_eq!(op.message_for(&out_of_stock()), OUT_OF_STOCK_MESSAGE);
        }
    }

    #[test]
    fn test_generic_messages() {
        let not_found = CartError::ProductNotFound(ProductId::new(1));
        assert_eq!(
            CartOperation::AddProduct.message_for(&not_found),
            "Erro na adição do produto"
        );
        assert_eq!(
            CartOperation::RemoveProduct.message_for(&not_found),
            "Erro na remoção do produto"
        );
        assert_eq!(
            CartOperation::UpdateProductAmount.message_for(&not_found),
            "Erro na alteração de quantidade do produto"
        );
    }

    #[test]
    fn test_api_error_maps_to_generic_message() {
        let err = CartError::from(ApiError::NotFound("/stock/1".to_string()));
        assert_eq!(
            CartOperation::AddProduct.message_for(&err),
            "Erro na adição do produto"
        );
    }
}
