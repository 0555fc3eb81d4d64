//! Synapse Market Storefront - event-driven state-coordination layer.
//!
//! # Architecture
//!
//! The storefront core is a typed publish/subscribe bus plus a family of
//! domain models that own all business state:
//!
//! - [`events`] - the [`events::EventBus`] and the closed [`events::AppEvent`]
//!   taxonomy (one variant per wire event name)
//! - [`models`] - catalog, basket, and order models, and the
//!   [`models::AppState`] coordinator that wires cross-model reactions
//! - [`api`] - the backend contract ([`api::ShopApi`]) and its `reqwest`
//!   implementation
//! - [`config`] - environment-driven configuration
//!
//! UI events enter the bus, coordinator handlers mutate the relevant model,
//! and every model mutation re-emits a "changed" event carrying a computed
//! snapshot. Models never call each other directly; all cross-model coupling
//! goes through the bus. The view layer consumes model-derived view models
//! and owns no business state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod events;
pub mod models;

pub use api::{HttpShopApi, OrderReceipt, OrderRequest, Product, ProductList, ShopApi, ShopError};
pub use config::{ConfigError, MarketConfig};
pub use events::{AppEvent, EventBus, EventKind, SubscriptionId};
pub use models::{
    AppState, BasketItem, BasketItemViewModel, BasketModel, CatalogModel, OrderDraft,
    OrderDraftError, OrderModel, ProductViewModel, ValidationErrors, ValidationResult,
};
