//! Wire types for the backend API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use synapse_market_core::{Email, OrderId, PaymentMethod, Phone, Price, ProductId};

/// A catalog product as delivered by the backend.
///
/// Immutable once loaded; `price: None` means the product is not for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form category label; mapped to a closed display bucket by the
    /// catalog model.
    #[serde(default)]
    pub category: Option<String>,
    /// CDN-relative image path.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
}

/// Response shape of `GET /product/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    pub total: u64,
    pub items: Vec<Product>,
}

/// Request shape of `POST /order/`.
///
/// Built exclusively by the order model's `to_request_dto`, which guarantees
/// every field is present and well-formed before this struct exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<ProductId>,
    pub payment: PaymentMethod,
    pub address: String,
    pub email: Email,
    pub phone: Phone,
    pub total: Decimal,
}

/// Response shape of `POST /order/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: OrderId,
    pub total: Decimal,
}
