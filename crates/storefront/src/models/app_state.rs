//! Application state coordinator.
//!
//! Owns the top-level lifecycle and wires every cross-model reaction. The
//! models never call each other; all coupling runs through the bus via the
//! handlers bound here, which keeps the dependency graph acyclic at the
//! type level even though the runtime event graph is not.

use std::sync::Arc;

use tracing::{error, warn};

use crate::api::ShopApi;
use crate::events::{AppEvent, EventBus, EventKind};

use super::basket::BasketModel;
use super::catalog::CatalogModel;
use super::order::OrderModel;

/// The coordinator. Cheaply cloneable via `Arc`; handlers hold clones.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    bus: EventBus,
    api: Arc<dyn ShopApi>,
    catalog: CatalogModel,
    basket: BasketModel,
    order: OrderModel,
}

impl AppState {
    /// Assemble the application and bind all event handlers.
    ///
    /// Binding happens exactly once, here.
    pub fn new(
        bus: EventBus,
        api: Arc<dyn ShopApi>,
        catalog: CatalogModel,
        basket: BasketModel,
        order: OrderModel,
    ) -> Self {
        let state = Self {
            inner: Arc::new(AppStateInner {
                bus,
                api,
                catalog,
                basket,
                order,
            }),
        };
        state.bind_events();
        state
    }

    /// Load the catalog, then signal readiness.
    ///
    /// `app:ready` is emitted only after the load resolves; the UI must not
    /// render the catalog before it fires.
    pub async fn init(&self) {
        self.inner.catalog.load().await;
        self.inner.bus.emit(AppEvent::AppReady);
    }

    /// The order submission workflow.
    ///
    /// Sets the contacts, builds the request, and calls the backend. Every
    /// failure is converted to an `order:error` event; a draft that fails
    /// the contract check never reaches the wire. On success the basket is
    /// cleared and `order:success` carries the backend receipt.
    pub async fn submit_contacts(&self, email: String, phone: String) {
        self.inner.order.set_contacts(Some(email), Some(phone));

        let dto = match self.inner.order.to_request_dto() {
            Ok(dto) => dto,
            Err(err) => {
                warn!(error = %err, "order rejected before submission");
                self.inner.bus.emit(AppEvent::OrderError {
                    message: err.to_string(),
                });
                return;
            }
        };

        match self.inner.api.create_order(&dto).await {
            Ok(receipt) => {
                self.inner.basket.clear();
                self.inner.bus.emit(AppEvent::OrderSuccess {
                    order_id: receipt.id,
                    total: receipt.total,
                });
            }
            Err(err) => {
                warn!(error = %err, "order submission failed");
                self.inner.bus.emit(AppEvent::OrderError {
                    message: err.to_string(),
                });
            }
        }
    }

    /// The shared bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// The catalog model.
    #[must_use]
    pub fn catalog(&self) -> &CatalogModel {
        &self.inner.catalog
    }

    /// The basket model.
    #[must_use]
    pub fn basket(&self) -> &BasketModel {
        &self.inner.basket
    }

    /// The order model.
    #[must_use]
    pub fn order(&self) -> &OrderModel {
        &self.inner.order
    }

    fn bind_events(&self) {
        let bus = self.inner.bus.clone();

        let app = self.clone();
        bus.on(EventKind::CardSelect, move |event| {
            if let AppEvent::CardSelect { id } = event {
                app.inner.catalog.select_product(id.clone());
            }
        });

        let app = self.clone();
        bus.on(EventKind::CardAddToBasket, move |event| {
            if let AppEvent::CardAddToBasket { id } = event {
                // Unknown ids are silently ignored.
                if let Some(product) = app.inner.catalog.product_by_id(id) {
                    app.inner.basket.add(product);
                }
            }
        });

        let app = self.clone();
        bus.on(EventKind::CardToggleBasket, move |event| {
            if let AppEvent::CardToggleBasket { id } = event {
                if let Some(product) = app.inner.catalog.product_by_id(id) {
                    app.inner.basket.toggle(product);
                }
            }
        });

        let app = self.clone();
        bus.on(EventKind::BasketRemove, move |event| {
            if let AppEvent::BasketRemove { id } = event {
                app.inner.basket.remove(id);
            }
        });

        // Keep the order's total source fresh on every basket transition.
        let app = self.clone();
        bus.on(EventKind::BasketChanged, move |event| {
            if let AppEvent::BasketChanged { items, .. } = event {
                app.inner.order.attach_basket(items);
            }
        });

        // User-originated field edits only; `order:changed` is a different
        // event, so the model's own notifications can never loop back here.
        let app = self.clone();
        bus.on(EventKind::OrderUpdate, move |event| {
            if let AppEvent::OrderUpdate {
                payment,
                address,
                email,
                phone,
            } = event
            {
                if let Some(method) = payment {
                    app.inner.order.set_payment(*method);
                }
                if let Some(address) = address {
                    app.inner.order.set_address(address.clone());
                }
                if email.is_some() || phone.is_some() {
                    app.inner.order.set_contacts(email.clone(), phone.clone());
                }
            }
        });

        let app = self.clone();
        bus.on(EventKind::ContactsUpdate, move |event| {
            if let AppEvent::ContactsUpdate { email, phone } = event {
                app.inner.order.set_contacts(email.clone(), phone.clone());
            }
        });

        let app = self.clone();
        bus.on(EventKind::ContactsSubmit, move |event| {
            if let AppEvent::ContactsSubmit { email, phone } = event {
                let app = app.clone();
                let email = email.clone();
                let phone = phone.clone();
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            app.submit_contacts(email, phone).await;
                        });
                    }
                    Err(_) => warn!("contacts:submit dropped: no async runtime"),
                }
            }
        });

        // The draft reset lives with the host application, not OrderModel.
        let app = self.clone();
        bus.on(EventKind::ModalClose, move |_| {
            app.inner.order.reset();
        });

        bus.on(EventKind::AppError, |event| {
            if let AppEvent::AppError { message } = event {
                error!(message, "application error");
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use synapse_market_core::{PaymentMethod, Price, ProductId};

    use super::*;
    use crate::api::{OrderReceipt, OrderRequest, Product, ProductList, ShopError};
    use crate::models::order::{OrderDraft, ValidationResult};
    use crate::models::ValidationErrors;

    struct MockApi {
        products: Vec<Product>,
        orders: Mutex<Vec<OrderRequest>>,
    }

    impl MockApi {
        fn with_products(products: Vec<Product>) -> Self {
            Self {
                products,
                orders: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ShopApi for MockApi {
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
            self.orders.lock().unwrap().push(order.clone());
            Ok(OrderReceipt {
                id: synapse_market_core::OrderId::new("mock-1"),
                total: order.total,
            })
        }
    }

    fn product(id: &str, price: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: None,
            category: None,
            image: None,
            price: price.map(Price::from),
        }
    }

    fn app_with(products: Vec<Product>) -> (AppState, Arc<MockApi>) {
        let bus = EventBus::new();
        let api = Arc::new(MockApi::with_products(products));
        let catalog = CatalogModel::new(
            bus.clone(),
            Arc::clone(&api) as Arc<dyn ShopApi>,
            "https://cdn.example.com",
        );
        let basket = BasketModel::new(bus.clone());
        let order = OrderModel::new(bus.clone());
        let app = AppState::new(bus, Arc::clone(&api) as Arc<dyn ShopApi>, catalog, basket, order);
        (app, api)
    }

    #[tokio::test]
    async fn test_init_emits_ready_after_catalog_loaded() {
        let (app, _api) = app_with(vec![product("p-1", Some(100))]);

        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        app.bus().on_any(move |event| {
            sink.lock().unwrap().push(event.name());
        });

        app.init().await;

        let names = names.lock().unwrap();
        let loaded = names.iter().position(|n| *n == "catalog:loaded").unwrap();
        let ready = names.iter().position(|n| *n == "app:ready").unwrap();
        assert!(loaded < ready, "app:ready must follow catalog:loaded");
    }

    #[tokio::test]
    async fn test_add_to_basket_ignores_unknown_ids() {
        let (app, _api) = app_with(vec![product("p-1", Some(100))]);
        app.init().await;

        app.bus().emit(AppEvent::CardAddToBasket {
            id: ProductId::new("ghost"),
        });
        assert_eq!(app.basket().count(), 0);

        app.bus().emit(AppEvent::CardAddToBasket {
            id: ProductId::new("p-1"),
        });
        assert_eq!(app.basket().count(), 1);
    }

    #[tokio::test]
    async fn test_basket_changes_keep_order_total_source_fresh() {
        let (app, _api) = app_with(vec![product("p-1", Some(100))]);
        app.init().await;

        app.bus().emit(AppEvent::CardAddToBasket {
            id: ProductId::new("p-1"),
        });
        app.order().set_payment(PaymentMethod::Cash);
        app.order().set_address("A");
        app.order().set_contacts(
            Some("a@b.co".to_owned()),
            Some("+7 (123) 456-78-90".to_owned()),
        );

        let dto = app.order().to_request_dto().unwrap();
        assert_eq!(dto.total, Decimal::from(100));

        app.bus().emit(AppEvent::BasketRemove {
            id: ProductId::new("p-1"),
        });
        let dto = app.order().to_request_dto().unwrap();
        assert_eq!(dto.total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_order_update_routes_fields_to_setters() {
        let (app, _api) = app_with(Vec::new());

        app.bus().emit(AppEvent::OrderUpdate {
            payment: Some(PaymentMethod::Card),
            address: Some("Main St 1".to_owned()),
            email: None,
            phone: None,
        });
        app.bus().emit(AppEvent::OrderUpdate {
            payment: None,
            address: None,
            email: Some("a@b.co".to_owned()),
            phone: None,
        });

        assert_eq!(app.order().payment(), Some(PaymentMethod::Card));
        assert_eq!(app.order().address().as_deref(), Some("Main St 1"));
        assert_eq!(app.order().email().as_deref(), Some("a@b.co"));
        assert!(app.order().phone().is_none());
    }

    /// Regression guard: the model's own change notification must never be
    /// taken for a field-edit instruction.
    #[tokio::test]
    async fn test_order_changed_never_mutates_the_draft() {
        let (app, _api) = app_with(Vec::new());

        app.bus().emit(AppEvent::OrderChanged {
            draft: OrderDraft {
                payment: Some(PaymentMethod::Card),
                address: Some("Injected".to_owned()),
                email: Some("evil@x.co".to_owned()),
                phone: Some("+7 (000) 000-00-00".to_owned()),
            },
            validation: ValidationResult {
                valid: true,
                errors: ValidationErrors::default(),
            },
        });

        assert!(app.order().payment().is_none());
        assert!(app.order().address().is_none());
        assert!(app.order().email().is_none());
        assert!(app.order().phone().is_none());
    }

    #[tokio::test]
    async fn test_modal_close_resets_the_draft() {
        let (app, _api) = app_with(Vec::new());

        app.order().set_payment(PaymentMethod::Card);
        app.order().set_address("A");
        app.bus().emit(AppEvent::ModalClose);

        assert!(app.order().payment().is_none());
        assert!(app.order().address().is_none());
    }

    #[tokio::test]
    async fn test_submit_with_invalid_phone_never_reaches_the_backend() {
        let (app, api) = app_with(vec![product("p-1", Some(100))]);
        app.init().await;
        app.bus().emit(AppEvent::CardAddToBasket {
            id: ProductId::new("p-1"),
        });
        app.order().set_payment(PaymentMethod::Card);
        app.order().set_address("A");

        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        app.bus().on(EventKind::OrderError, move |event| {
            if let AppEvent::OrderError { message } = event {
                sink.lock().unwrap().push(message.clone());
            }
        });

        app.submit_contacts("a@b.co".to_owned(), "not-a-phone".to_owned())
            .await;

        assert!(api.orders.lock().unwrap().is_empty());
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.first().unwrap().contains("phone"));
    }
}
