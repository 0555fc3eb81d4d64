//! Backend API contract and client.
//!
//! The backend is a plain JSON-over-HTTP service with three operations:
//! product list, product by id, and order creation. The [`ShopApi`] trait is
//! the seam the models and coordinator depend on; [`HttpShopApi`] is the
//! production implementation, and tests substitute an in-process mock.

mod http;
pub mod types;

pub use http::HttpShopApi;
pub use types::{OrderReceipt, OrderRequest, Product, ProductList};

use async_trait::async_trait;
use synapse_market_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ShopError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Backend returned a non-success status.
    #[error("Backend error: HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },
}

/// The backend operations the storefront depends on.
///
/// No retries, no in-flight de-duplication, no cancellation: a failed call
/// surfaces as an error and requires a new explicit user action.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Fetch the full product list.
    async fn get_products(&self) -> Result<ProductList, ShopError>;

    /// Fetch one product by id.
    async fn get_product(&self, id: &ProductId) -> Result<Product, ShopError>;

    /// Submit an order and return the backend receipt.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ShopError>;
}
