//! The cart manager: add, remove, and update-quantity over a persisted cart.
//!
//! Each operation works on a copy of the current cart, checks stock where
//! needed, persists the copy, and only then publishes it. A failure at any
//! step leaves the published cart untouched, raises a toast through the
//! [`Notifier`], and is returned to the caller.
//!
//! Mutations are serialized: an operation waits for the previous one to
//! finish, including its network calls. Reads never wait.

use std::sync::Arc;

use rocketshoes_core::{Cart, CartEntry, CartSummary, ProductId};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{ApiError, CatalogApi, CatalogClient};
use crate::config::CartConfig;
use crate::error::{CartError, CartOperation, Result};
use crate::notify::{Notification, Notifier};
use crate::storage::{FileStore, KeyValueStore};

/// Cart state manager.
///
/// Cheaply cloneable; clones share the same cart.
pub struct CartManager<A, S, N> {
    inner: Arc<CartManagerInner<A, S, N>>,
}

struct CartManagerInner<A, S, N> {
    api: A,
    store: S,
    notifier: N,
    storage_key: String,
    state: watch::Sender<Cart>,
    mutation: Mutex<()>,
}

impl<A, S, N> Clone for CartManager<A, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Notifier> CartManager<CatalogClient, FileStore, N> {
    /// Build a manager backed by the HTTP catalog and a file store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub async fn from_config(config: &CartConfig, notifier: N) -> std::result::Result<Self, ApiError> {
        let api = CatalogClient::new(&config.api)?;
        let store = FileStore::new(&config.storage_dir);
        Ok(Self::load(api, store, notifier, config.storage_key.clone()).await)
    }
}

impl<A, S, N> CartManager<A, S, N>
where
    A: CatalogApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// Restore the cart persisted under `storage_key`.
    ///
    /// A missing snapshot yields an empty cart. So does a snapshot that
    /// cannot be read or parsed, or that breaks a cart invariant; the
    /// problem is logged and startup continues.
    #[instrument(skip(api, store, notifier, storage_key))]
    pub async fn load(api: A, store: S, notifier: N, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let cart = match store.get(&storage_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => {
                    info!(key = %storage_key, entries = cart.len(), "Restored cart");
                    cart
                }
                Err(e) => {
                    warn!(key = %storage_key, error = %e, "Discarding unreadable cart snapshot");
                    Cart::new()
                }
            },
            Ok(None) => {
                debug!(key = %storage_key, "No cart snapshot, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        };

        Self::with_cart(api, store, notifier, storage_key, cart)
    }

    /// Start from `cart` without reading the store.
    #[must_use]
    pub fn with_cart(api: A, store: S, notifier: N, storage_key: impl Into<String>, cart: Cart) -> Self {
        let (state, _) = watch::channel(cart);
        Self {
            inner: Arc::new(CartManagerInner {
                api,
                store,
                notifier,
                storage_key: storage_key.into(),
                state,
                mutation: Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Observe every cart this manager publishes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.inner.state.borrow().summary()
    }

    /// Key the cart snapshot is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of `product_id`.
    ///
    /// Appends a new entry with amount 1, fetching the product record, or
    /// increments an existing entry. Either way the new amount must be
    /// covered by current stock.
    ///
    /// # Errors
    ///
    /// `CartError::OutOfStock` if stock does not cover the new amount; any
    /// catalog or storage failure otherwise. The cart is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::AddProduct, result)
    }

    /// Remove the entry for `product_id`.
    ///
    /// # Errors
    ///
    /// `CartError::ProductNotFound` if the product is not in the cart; a
    /// storage error if the new cart cannot be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_remove_product(product_id).await;
        self.report(CartOperation::RemoveProduct, result)
    }

    /// Set the amount of an existing entry.
    ///
    /// An `amount` of zero or less is ignored: no error, no change, no toast.
    ///
    /// # Errors
    ///
    /// `CartError::ProductNotFound` if the product is not in the cart,
    /// `CartError::OutOfStock` if stock does not cover `amount`, or a catalog
    /// or storage failure. The cart is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<()> {
        let result = self.try_update_product_amount(product_id, amount).await;
        self.report(CartOperation::UpdateProductAmount, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<()> {
        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        let current = cart.amount_of(product_id);
        let requested = current.map_or(1, |amount| u64::from(amount) + 1);

        let target = self.ensure_stock(product_id, requested).await?;

        if current.is_some() {
            cart.set_amount(product_id, target);
        } else {
            let product = self.inner.api.product(product_id).await?;
            cart.push(CartEntry::new(product, target))?;
        }

        self.commit(cart).await?;
        info!(amount = target, "Added product to cart");
        Ok(())
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<()> {
        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        if cart.remove(product_id).is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        self.commit(cart).await?;
        info!("Removed product from cart");
        Ok(())
    }

    async fn try_update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<()> {
        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        if !cart.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }

        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let granted = self.ensure_stock(product_id, amount.unsigned_abs()).await?;
        cart.set_amount(product_id, granted);

        self.commit(cart).await?;
        info!(amount = granted, "Updated product amount");
        Ok(())
    }

    /// Check that current stock covers `requested` units and return the
    /// amount as stored in the cart.
    async fn ensure_stock(&self, product_id: ProductId, requested: u64) -> Result<u32> {
        let stock = self.inner.api.stock(product_id).await?;

        if !stock.covers(requested) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        u32::try_from(requested).map_err(|_| CartError::AmountOverflow(product_id))
    }

    /// Persist `cart`, then publish it.
    async fn commit(&self, cart: Cart) -> Result<()> {
        let snapshot = serde_json::to_string(&cart)?;
        self.inner
            .store
            .set(&self.inner.storage_key, &snapshot)
            .await?;
        self.inner.state.send_replace(cart);
        Ok(())
    }

    /// Log a failed operation and raise its toast.
    fn report(&self, operation: CartOperation, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            match e {
                CartError::OutOfStock { .. } | CartError::ProductNotFound(_) => {
                    warn!(operation = %operation, error = %e, "Cart operation rejected");
                }
                _ => {
                    error!(operation = %operation, error = %e, "Cart operation failed");
                }
            }
            self.inner
                .notifier
                .notify(Notification::error(operation.message_for(e)));
        }
        result
    }
}
