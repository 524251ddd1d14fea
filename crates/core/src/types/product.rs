//! Catalog product and stock records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;

/// A product record as returned by the catalog API.
///
/// Fields the storefront does not interpret are kept in `extra` and written
/// back unchanged, so a cart snapshot carries everything the API returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra fields.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: None,
            extra: Map::new(),
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }
}

/// Available stock for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let raw = json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg",
            "brand": "Rocket",
            "sizes": [38, 39, 40]
        });

        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert_eq!(product.extra.get("brand"), Some(&json!("Rocket")));

        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[test]
    fn test_product_without_image() {
        let product: Product =
            serde_json::from_value(json!({"id": 2, "title": "Meia", "price": 10})).unwrap();
        assert!(product.image.is_none());
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_stock_wire_format() {
        let stock: Stock = serde_json::from_value(json!({"id": 3, "amount": 2})).unwrap();
        assert_eq!(stock.product_id, ProductId::new(3));
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        let result = serde_json::from_value::<Stock>(json!({"id": 3, "amount": -1}));
        assert!(result.is_err());
    }
}
