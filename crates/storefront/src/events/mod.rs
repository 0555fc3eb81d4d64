//! In-process event taxonomy and dispatch.
//!
//! Every event the application can emit is a variant of [`AppEvent`], so
//! handlers receive typed payloads instead of loose key/value bags. Each
//! variant maps to a stable wire name (the `section:action` strings views
//! subscribe to) and to a fieldless [`EventKind`] discriminant used for
//! exact-match subscriptions.
//!
//! User-originated edits (`order:update`, `contacts:update`) and model
//! change notifications (`order:changed`) are distinct variants, so a
//! coordinator handler can never mistake a validation broadcast for a field
//! edit instruction.

mod bus;

pub use bus::{EventBus, SubscriptionId};

use rust_decimal::Decimal;
use synapse_market_core::{OrderId, PaymentMethod, ProductId};

use crate::api::Product;
use crate::models::{BasketItem, OrderDraft, ValidationResult};

/// All application events, one variant per wire name.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Startup lifecycle finished; the catalog may be rendered.
    AppReady,
    /// Unrecoverable application-level failure.
    AppError { message: String },

    /// Catalog fetch started.
    CatalogLoad,
    /// Catalog fetch succeeded; payload is the fresh product list.
    CatalogLoaded { products: Vec<Product> },
    /// Catalog fetch failed.
    CatalogError { message: String },

    /// A product card was clicked for preview.
    CardSelect { id: ProductId },
    /// "Add to basket" pressed on a card.
    CardAddToBasket { id: ProductId },
    /// "In basket" toggle pressed on a card.
    CardToggleBasket { id: ProductId },

    /// Removal requested from the basket view.
    BasketRemove { id: ProductId },
    /// Basket view requested.
    BasketOpen,
    /// Basket contents changed; payload is a computed snapshot.
    BasketChanged {
        items: Vec<BasketItem>,
        count: usize,
        total: Decimal,
    },

    /// Shipping form requested.
    OrderOpen,
    /// User edited order fields (payment/address/email/phone).
    OrderUpdate {
        payment: Option<PaymentMethod>,
        address: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    },
    /// Order draft changed; payload carries the draft and a validation
    /// result whose scope depends on which fields were last written.
    OrderChanged {
        draft: OrderDraft,
        validation: ValidationResult,
    },
    /// Shipping step accepted; the contacts form should open.
    OrderSubmit,
    /// Order accepted by the backend.
    OrderSuccess { order_id: OrderId, total: Decimal },
    /// Order submission failed (contract violation or backend error).
    OrderError { message: String },

    /// User edited contact fields.
    ContactsUpdate {
        email: Option<String>,
        phone: Option<String>,
    },
    /// Contacts form submitted; triggers the order submission workflow.
    ContactsSubmit { email: String, phone: String },

    /// Modal shown.
    ModalOpen,
    /// Modal dismissed; the coordinator resets the order draft.
    ModalClose,
}

impl AppEvent {
    /// The stable wire name for this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppReady => "app:ready",
            Self::AppError { .. } => "app:error",
            Self::CatalogLoad => "catalog:load",
            Self::CatalogLoaded { .. } => "catalog:loaded",
            Self::CatalogError { .. } => "catalog:error",
            Self::CardSelect { .. } => "card:select",
            Self::CardAddToBasket { .. } => "card:add-to-basket",
            Self::CardToggleBasket { .. } => "card:toggle-basket",
            Self::BasketRemove { .. } => "basket:remove",
            Self::BasketOpen => "basket:open",
            Self::BasketChanged { .. } => "basket:changed",
            Self::OrderOpen => "order:open",
            Self::OrderUpdate { .. } => "order:update",
            Self::OrderChanged { .. } => "order:changed",
            Self::OrderSubmit => "order:submit",
            Self::OrderSuccess { .. } => "order:success",
            Self::OrderError { .. } => "order:error",
            Self::ContactsUpdate { .. } => "contacts:update",
            Self::ContactsSubmit { .. } => "contacts:submit",
            Self::ModalOpen => "modal:open",
            Self::ModalClose => "modal:close",
        }
    }

    /// The fieldless discriminant for exact-match subscriptions.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AppReady => EventKind::AppReady,
            Self::AppError { .. } => EventKind::AppError,
            Self::CatalogLoad => EventKind::CatalogLoad,
            Self::CatalogLoaded { .. } => EventKind::CatalogLoaded,
            Self::CatalogError { .. } => EventKind::CatalogError,
            Self::CardSelect { .. } => EventKind::CardSelect,
            Self::CardAddToBasket { .. } => EventKind::CardAddToBasket,
            Self::CardToggleBasket { .. } => EventKind::CardToggleBasket,
            Self::BasketRemove { .. } => EventKind::BasketRemove,
            Self::BasketOpen => EventKind::BasketOpen,
            Self::BasketChanged { .. } => EventKind::BasketChanged,
            Self::OrderOpen => EventKind::OrderOpen,
            Self::OrderUpdate { .. } => EventKind::OrderUpdate,
            Self::OrderChanged { .. } => EventKind::OrderChanged,
            Self::OrderSubmit => EventKind::OrderSubmit,
            Self::OrderSuccess { .. } => EventKind::OrderSuccess,
            Self::OrderError { .. } => EventKind::OrderError,
            Self::ContactsUpdate { .. } => EventKind::ContactsUpdate,
            Self::ContactsSubmit { .. } => EventKind::ContactsSubmit,
            Self::ModalOpen => EventKind::ModalOpen,
            Self::ModalClose => EventKind::ModalClose,
        }
    }
}

/// Event discriminants, mirroring [`AppEvent`] without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AppReady,
    AppError,
    CatalogLoad,
    CatalogLoaded,
    CatalogError,
    CardSelect,
    CardAddToBasket,
    CardToggleBasket,
    BasketRemove,
    BasketOpen,
    BasketChanged,
    OrderOpen,
    OrderUpdate,
    OrderChanged,
    OrderSubmit,
    OrderSuccess,
    OrderError,
    ContactsUpdate,
    ContactsSubmit,
    ModalOpen,
    ModalClose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_kind() {
        let event = AppEvent::CardSelect {
            id: ProductId::new("p-1"),
        };
        assert_eq!(event.name(), "card:select");
        assert_eq!(event.kind(), EventKind::CardSelect);
    }

    #[test]
    fn test_wire_names_are_section_action() {
        let events = [
            AppEvent::AppReady,
            AppEvent::CatalogLoad,
            AppEvent::BasketOpen,
            AppEvent::OrderSubmit,
            AppEvent::ModalClose,
        ];
        for event in events {
            let name = event.name();
            assert!(name.contains(':'), "{name} is missing a section");
        }
    }
}
