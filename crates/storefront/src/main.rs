//! Synapse Market Storefront - headless runner.
//!
//! Wires the bus, models, coordinator, and backend client, runs the startup
//! lifecycle, and logs the resulting catalog. The interactive view layer is
//! an external collaborator; it subscribes to the same bus and consumes the
//! same view models this binary logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use synapse_market_storefront::{
    AppState, BasketModel, CatalogModel, EventBus, HttpShopApi, MarketConfig, OrderModel, ShopApi,
};

#[tokio::main]
async fn main() {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "synapse_market_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MarketConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let bus = EventBus::new();

    // Diagnostics: trace every emission without touching per-event wiring.
    bus.on_any(|event| {
        tracing::debug!(event = event.name(), "event emitted");
    });

    let api: Arc<dyn ShopApi> = Arc::new(HttpShopApi::new(&config));
    let catalog = CatalogModel::new(bus.clone(), Arc::clone(&api), config.cdn_base.as_str());
    let basket = BasketModel::new(bus.clone());
    let order = OrderModel::new(bus.clone());
    let app = AppState::new(bus, api, catalog, basket, order);

    app.init().await;

    for card in app.catalog().all_view_models() {
        tracing::info!(
            id = %card.id,
            title = %card.title,
            category = %card.category_label,
            price = %card.price_label,
            "product"
        );
    }
}
