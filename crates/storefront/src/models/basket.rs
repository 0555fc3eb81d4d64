//! Shopping basket model.
//!
//! The basket is a unique-item set: each product id appears at most once,
//! adding a present id is a no-op, and totals ignore quantity. Insertion
//! order is display order.

use rust_decimal::Decimal;
use serde::Serialize;
use synapse_market_core::ProductId;

use super::base::ModelState;
use super::price_label;
use crate::api::Product;
use crate::events::{AppEvent, EventBus};

/// One basket entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketItem {
    pub product: Product,
}

/// Display row for the basket view, with a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketItemViewModel {
    pub id: ProductId,
    pub title: String,
    pub price_label: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
struct BasketState {
    items: Vec<BasketItem>,
}

/// Owns the basket contents and their derived count/total.
///
/// Every actual state transition re-emits `basket:changed` with a
/// `{items, count, total}` snapshot; true no-ops (adding a present id,
/// removing an absent one, clearing an empty basket) consistently emit
/// nothing.
pub struct BasketModel {
    state: ModelState<BasketState>,
}

impl BasketModel {
    /// Create an empty basket bound to the bus.
    pub fn new(bus: EventBus) -> Self {
        Self {
            state: ModelState::new(bus, BasketState::default()),
        }
    }

    /// Add a product. No-op when its id is already present.
    pub fn add(&self, product: Product) {
        let mut state = self.state.get();
        if state.items.iter().any(|item| item.product.id == product.id) {
            return;
        }
        state.items.push(BasketItem { product });
        self.state.set(state.clone());
        self.emit_changed(state.items);
    }

    /// Remove a product by id. No-op when absent.
    pub fn remove(&self, id: &ProductId) {
        let mut state = self.state.get();
        let before = state.items.len();
        state.items.retain(|item| &item.product.id != id);
        if state.items.len() == before {
            return;
        }
        self.state.set(state.clone());
        self.emit_changed(state.items);
    }

    /// Remove the product if present, otherwise add it.
    pub fn toggle(&self, product: Product) {
        if self.contains(&product.id) {
            self.remove(&product.id);
        } else {
            self.add(product);
        }
    }

    /// Empty the basket. No-op when already empty.
    pub fn clear(&self) {
        let state = self.state.get();
        if state.items.is_empty() {
            return;
        }
        self.state.set(BasketState::default());
        self.emit_changed(Vec::new());
    }

    /// Whether a product id is in the basket.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.state
            .get()
            .items
            .iter()
            .any(|item| &item.product.id == id)
    }

    /// Basket contents in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<BasketItem> {
        self.state.get().items
    }

    /// Number of distinct items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.get().items.len()
    }

    /// Sum of present prices; priceless items contribute zero.
    ///
    /// This is the same fold the order request later sends to the backend.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Self::total_of(&self.state.get().items)
    }

    /// Formatted total for the basket footer.
    #[must_use]
    pub fn total_label(&self) -> String {
        format!(
            "{} {}",
            self.total(),
            synapse_market_core::Price::CURRENCY_UNIT
        )
    }

    /// Display rows with 1-based indices, in insertion order.
    #[must_use]
    pub fn item_view_models(&self) -> Vec<BasketItemViewModel> {
        self.state
            .get()
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| BasketItemViewModel {
                id: item.product.id.clone(),
                title: item.product.title.clone(),
                price_label: price_label(item.product.price.as_ref()),
                index: i + 1,
            })
            .collect()
    }

    fn total_of(items: &[BasketItem]) -> Decimal {
        items
            .iter()
            .filter_map(|item| item.product.price.as_ref())
            .map(|price| price.amount())
            .sum()
    }

    fn emit_changed(&self, items: Vec<BasketItem>) {
        let count = items.len();
        let total = Self::total_of(&items);
        self.state.emit(AppEvent::BasketChanged {
            items,
            count,
            total,
        });
    }
}
