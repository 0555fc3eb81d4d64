//! Domain models owning all business state.
//!
//! Each model composes [`base::ModelState`]: one private state slot plus a
//! bound bus handle. State is read as snapshots and replaced whole; every
//! public mutation path re-emits a "changed" event carrying computed
//! summaries, never raw internals.

pub mod app_state;
mod base;
pub mod basket;
pub mod catalog;
pub mod order;

pub use app_state::AppState;
pub use basket::{BasketItem, BasketItemViewModel, BasketModel};
pub use catalog::{CatalogModel, CategoryBucket, ProductViewModel};
pub use order::{OrderDraft, OrderDraftError, OrderModel, ValidationErrors, ValidationResult};

use synapse_market_core::Price;

/// Fixed display label for products that cannot be bought.
pub const PRICELESS_LABEL: &str = "Priceless";

/// Display label for an optional price.
///
/// Catalog cards and basket rows must agree on this, so it lives here and
/// nowhere in the view layer.
pub(crate) fn price_label(price: Option<&Price>) -> String {
    price.map_or_else(|| PRICELESS_LABEL.to_owned(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(Some(&Price::from(100))), "100 synapses");
        assert_eq!(price_label(None), "Priceless");
    }
}
