//! REST catalog client implementation.
//!
//! Uses `reqwest` for HTTP. Caches product records using `moka`; stock is
//! fetched on every call.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{ApiError, CatalogApi};
use crate::config::CatalogApiConfig;

/// Longest slice of a response body kept in errors and logs.
const MAX_BODY_EXCERPT: usize = 200;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

/// Body of `GET /stock/{id}`. Only the amount is read; the id in the URL is
/// authoritative.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: u32,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// A zero `product_cache_ttl` disables product caching.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = (!config.product_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.product_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> Result<Url, ApiError> {
        Ok(self
            .inner
            .base_url
            .join(&format!("{resource}/{product_id}"))?)
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .get(url.clone())
            .header("Accept", "application/json");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %excerpt(&response_text),
                "Catalog API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: excerpt(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %excerpt(&response_text),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        let url = self.endpoint("stock", product_id)?;
        let response: StockResponse = self.get_json(url).await?;
        debug!(amount = response.amount, "Fetched stock");

        Ok(Stock {
            product_id,
            amount: response.amount,
        })
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(product_id);

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Product(product)) = cache.get(&cache_key).await
        {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint("products", product_id)?;
        let product: Product = self.get_json(url).await?;

        if product.id != product_id {
            return Err(ApiError::UnexpectedProduct {
                requested: product_id,
                returned: product.id,
            });
        }

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }
}

/// First `MAX_BODY_EXCERPT` characters of a response body.
fn excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT).collect()
}
