//! HTTP implementation of the backend contract.
//!
//! Uses `reqwest` for transport and caches product reads in-process with
//! `moka` (5-minute TTL). Order creation is never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use synapse_market_core::ProductId;
use tracing::debug;

use super::types::{OrderReceipt, OrderRequest, Product, ProductList};
use super::{ShopApi, ShopError};
use crate::config::MarketConfig;

/// Cached backend responses.
#[derive(Clone)]
enum CacheValue {
    ProductList(ProductList),
    Product(Product),
}

/// `reqwest`-backed [`ShopApi`] implementation.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct HttpShopApi {
    inner: Arc<HttpShopApiInner>,
}

struct HttpShopApiInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl HttpShopApi {
    /// Create a new backend client from configuration.
    #[must_use]
    pub fn new(config: &MarketConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(HttpShopApiInner {
                client: reqwest::Client::new(),
                base_url: config.api_base.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ShopError> {
        let response = self.inner.client.get(url).send().await?;
        Self::parse_response(response, url).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ShopError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopError::NotFound(url.to_owned()));
        }

        // Read the body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ShopError::Status {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn get_products(&self) -> Result<ProductList, ShopError> {
        const KEY: &str = "products";

        if let Some(CacheValue::ProductList(list)) = self.inner.cache.get(KEY).await {
            debug!("product list served from cache");
            return Ok(list);
        }

        let url = format!("{}/product/", self.inner.base_url);
        let list: ProductList = self.get_json(&url).await?;
        self.inner
            .cache
            .insert(KEY.to_owned(), CacheValue::ProductList(list.clone()))
            .await;
        Ok(list)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ShopError> {
        let key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!(%id, "product served from cache");
            return Ok(product);
        }

        let url = format!("{}/product/{id}", self.inner.base_url);
        let product: Product = self.get_json(&url).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(product.clone()))
            .await;
        Ok(product)
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ShopError> {
        let url = format!("{}/order/", self.inner.base_url);
        let response = self.inner.client.post(&url).json(order).send().await?;
        Self::parse_response(response, &url).await
    }
}
