//! Cart entries, the ordered cart, and its derived summary.
//!
//! `Cart` only enforces its own shape: one entry per product, amounts of at
//! least one, insertion order preserved. Stock checks and persistence live in
//! the cart manager.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A violated cart invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// Two entries share a product id.
    #[error("duplicate cart entry for product {0}")]
    DuplicateProduct(ProductId),

    /// An entry holds fewer than one unit.
    #[error("cart entry for product {0} has amount 0")]
    ZeroAmount(ProductId),
}

/// A single product's record within the cart.
///
/// Serialized flat: the product's fields followed by `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartEntry {
    /// Create an entry for `product` holding `amount` units.
    #[must_use]
    pub fn new(mut product: Product, amount: u32) -> Self {
        // A stray "amount" in the catalog record would shadow ours on the wire.
        product.extra.remove("amount");
        Self { product, amount }
    }

    /// Product id of this entry.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// Ordered collection of distinct product entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from entries, checking uniqueness and amounts.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if two entries share a product id or an
    /// entry has amount zero.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, CartInvariantError> {
        let mut cart = Self::new();
        for entry in entries {
            if entry.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(entry.product_id()));
            }
            if cart.contains(entry.product_id()) {
                return Err(CartInvariantError::DuplicateProduct(entry.product_id()));
            }
            cart.entries.push(entry);
        }
        Ok(cart)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id() == product_id)
    }

    /// Whether the cart has an entry for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Current amount for `product_id`, if present.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> Option<u32> {
        self.get(product_id).map(|e| e.amount)
    }

    /// Append a new entry.
    ///
    /// # Errors
    ///
    /// Rejects the entry, leaving the cart unchanged, if the product is
    /// already present or the amount is zero.
    pub fn push(&mut self, entry: CartEntry) -> Result<(), CartInvariantError> {
        if entry.amount == 0 {
            return Err(CartInvariantError::ZeroAmount(entry.product_id()));
        }
        if self.contains(entry.product_id()) {
            return Err(CartInvariantError::DuplicateProduct(entry.product_id()));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Set the amount of an existing entry in place.
    ///
    /// Returns `false` if there is no entry for `product_id` or `amount` is
    /// zero; the cart is unchanged in both cases.
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        match self
            .entries
            .iter_mut()
            .find(|e| e.product_id() == product_id)
        {
            Some(entry) => {
                entry.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove and return the entry for `product_id`.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.product_id() == product_id)?;
        Some(self.entries.remove(index))
    }

    /// Derived totals for display.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = CartInvariantError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Per-line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineSummary {
    pub product_id: ProductId,
    pub title: String,
    pub amount: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Totals shown in the storefront header and cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLineSummary>,
    /// Distinct products, the header badge count.
    pub product_count: usize,
    pub total_quantity: u64,
    pub subtotal: Price,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        let lines: Vec<CartLineSummary> = cart
            .entries
            .iter()
            .map(|entry| CartLineSummary {
                product_id: entry.product_id(),
                title: entry.product.title.clone(),
                amount: entry.amount,
                unit_price: entry.product.price,
                subtotal: entry.line_total(),
            })
            .collect();

        Self {
            product_count: lines.len(),
            total_quantity: lines.iter().map(|l| u64::from(l.amount)).sum(),
            subtotal: lines.iter().map(|l| l.subtotal).sum(),
            lines,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: i32, cents: i64) -> Product {
        Product::new(ProductId::new(id), format!("Tênis {id}"), Price::from_cents(cents))
    }

    fn entry(id: i32, amount: u32) -> CartEntry {
        CartEntry::new(product(id, 10_000), amount)
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = CartEntry::new(product(1, 17990).with_image("https://img/1.jpg"), 2);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "id": 1,
                "title": "Tênis 1",
                "price": 179.9,
                "image": "https://img/1.jpg",
                "amount": 2
            })
        );
    }

    #[test]
    fn test_entry_drops_catalog_amount_field() {
        let mut p = product(1, 100);
        p.extra.insert("amount".to_string(), json!(99));
        let entry = CartEntry::new(p, 1);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value.get("amount"), Some(&json!(1)));
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.push(entry(3, 1)).unwrap();
        cart.push(entry(1, 1)).unwrap();
        cart.push(entry(2, 1)).unwrap();

        let ids: Vec<i32> = cart.entries().iter().map(|e| e.product_id().as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut cart = Cart::new();
        cart.push(entry(1, 1)).unwrap();
        let err = cart.push(entry(1, 4)).unwrap_err();
        assert_eq!(err, CartInvariantError::DuplicateProduct(ProductId::new(1)));
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));
    }

    #[test]
    fn test_set_amount() {
        let mut cart = Cart::from_entries(vec![entry(1, 1), entry(2, 5)]).unwrap();
        assert!(cart.set_amount(ProductId::new(2), 3));
        assert_eq!(cart.amount_of(ProductId::new(2)), Some(3));
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));

        assert!(!cart.set_amount(ProductId::new(9), 3));
        assert!(!cart.set_amount(ProductId::new(1), 0));
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from_entries(vec![entry(1, 1), entry(2, 1), entry(3, 1)]).unwrap();
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.product_id(), ProductId::new(2));
        assert_eq!(cart.len(), 2);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let raw = json!([
            {"id": 1, "title": "a", "price": 1, "amount": 1},
            {"id": 1, "title": "a", "price": 1, "amount": 2}
        ]);
        assert!(serde_json::from_value::<Cart>(raw).is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_amount() {
        let raw = json!([{"id": 1, "title": "a", "price": 1, "amount": 0}]);
        assert!(serde_json::from_value::<Cart>(raw).is_err());
    }

    #[test]
    fn test_snapshot_round_trip_keeps_order_and_fields() {
        let raw = json!([
            {"id": 2, "title": "b", "price": 139.9, "image": "i2", "amount": 3, "color": "red"},
            {"id": 1, "title": "a", "price": 179.9, "amount": 1}
        ]);
        let cart: Cart = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(cart.entries().first().map(CartEntry::product_id), Some(ProductId::new(2)));
        assert_eq!(serde_json::to_value(&cart).unwrap(), raw);
    }

    #[test]
    fn test_summary() {
        let cart = Cart::from_entries(vec![
            CartEntry::new(product(1, 17990), 2),
            CartEntry::new(product(2, 13990), 1),
        ])
        .unwrap();

        let summary = cart.summary();
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.subtotal, Price::from_cents(49970));
        assert_eq!(
            summary.lines.first().map(|l| l.subtotal),
            Some(Price::from_cents(35980))
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = Cart::new().summary();
        assert_eq!(summary.product_count, 0);
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.subtotal, Price::ZERO);
    }

    #[test]
    fn test_summary_with_price_near_decimal_max() {
        let raw = json!([{ "id": 1, "title": "a", "price": 7.0e28, "amount": 2 }]);
        let cart: Cart = serde_json::from_value(raw).unwrap();

        let summary = cart.summary();
        assert_eq!(summary.total_quantity, 2);
        assert_eq!(summary.subtotal, Price::new(rust_decimal::Decimal::MAX));
    }
}
