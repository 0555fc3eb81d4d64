//! Integration tests for Synapse Market.
//!
//! The scenarios under `tests/` drive the full storefront core - bus,
//! models, and coordinator - against [`MockShopApi`], an in-process backend
//! that serves canned products and records every order it receives.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use async_trait::async_trait;
use synapse_market_core::{OrderId, ProductId};
use synapse_market_storefront::{
    OrderReceipt, OrderRequest, Product, ProductList, ShopApi, ShopError,
};

/// Canned backend behavior for order creation.
pub enum OrderOutcome {
    /// Accept every order with this receipt id.
    Accept(OrderId),
    /// Reject every order with a backend error.
    Reject,
}

/// In-process [`ShopApi`] double.
pub struct MockShopApi {
    products: Vec<Product>,
    outcome: OrderOutcome,
    orders: Mutex<Vec<OrderRequest>>,
}

impl MockShopApi {
    /// A backend serving `products` and accepting orders as `receipt_id`.
    #[must_use]
    pub fn accepting(products: Vec<Product>, receipt_id: &str) -> Self {
        Self {
            products,
            outcome: OrderOutcome::Accept(OrderId::new(receipt_id)),
            orders: Mutex::new(Vec::new()),
        }
    }

    /// A backend serving `products` and rejecting every order.
    #[must_use]
    pub fn rejecting(products: Vec<Product>) -> Self {
        Self {
            products,
            outcome: OrderOutcome::Reject,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Every order request the backend has received.
    #[must_use]
    pub fn received_orders(&self) -> Vec<OrderRequest> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ShopApi for MockShopApi {
    async fn get_products(&self) -> Result<ProductList, ShopError> {
        Ok(ProductList {
            total: self.products.len() as u64,
            items: self.products.clone(),
        })
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ShopError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ShopError::NotFound(id.to_string()))
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ShopError> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(order.clone());
        match &self.outcome {
            OrderOutcome::Accept(id) => Ok(OrderReceipt {
                id: id.clone(),
                total: order.total,
            }),
            OrderOutcome::Reject => Err(ShopError::Status {
                status: 500,
                message: "order rejected".to_owned(),
            }),
        }
    }
}
