//! Product catalog model.

use std::sync::Arc;

use serde::Serialize;
use synapse_market_core::ProductId;
use tracing::warn;

use super::base::ModelState;
use super::price_label;
use crate::api::{Product, ShopApi};
use crate::events::{AppEvent, EventBus};

/// Image path used when a product has none.
const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

/// Closed set of display buckets for product categories.
///
/// Unknown and absent server labels fall back to [`CategoryBucket::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryBucket {
    SoftSkill,
    Other,
    Button,
    Addon,
}

impl CategoryBucket {
    /// Map a server category label to its bucket.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("soft-skill") => Self::SoftSkill,
            Some("button") => Self::Button,
            Some("addon") => Self::Addon,
            _ => Self::Other,
        }
    }

    /// CSS class modifier for the bucket (e.g. `card__category_soft`).
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::SoftSkill => "soft",
            Self::Other => "other",
            Self::Button => "button",
            Self::Addon => "additional",
        }
    }
}

/// Display-ready projection of a [`Product`] for card views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductViewModel {
    pub id: ProductId,
    pub title: String,
    pub category_label: String,
    pub category_class: String,
    /// Absolute CDN URL, or the placeholder path.
    pub image_url: String,
    pub price_label: String,
    pub is_buyable: bool,
}

#[derive(Debug, Clone, Default)]
struct CatalogState {
    products: Vec<Product>,
    loading: bool,
    selected: Option<ProductId>,
}

/// Owns the product list, the loading flag, and the current selection.
///
/// The product sequence preserves server order and is replaced wholesale on
/// each load.
pub struct CatalogModel {
    state: ModelState<CatalogState>,
    api: Arc<dyn ShopApi>,
    cdn_base: String,
}

impl CatalogModel {
    /// Create an empty catalog bound to the bus and backend.
    pub fn new(bus: EventBus, api: Arc<dyn ShopApi>, cdn_base: impl Into<String>) -> Self {
        Self {
            state: ModelState::new(bus, CatalogState::default()),
            api,
            cdn_base: cdn_base.into(),
        }
    }

    /// Fetch the product list from the backend.
    ///
    /// Emits `catalog:load` when the fetch starts, then either
    /// `catalog:loaded` with the fresh list or `catalog:error` with a
    /// message. Fetch failures never escape this method.
    pub async fn load(&self) {
        let mut state = self.state.get();
        state.loading = true;
        self.state.set(state);
        self.state.emit(AppEvent::CatalogLoad);

        match self.api.get_products().await {
            Ok(list) => {
                let mut state = self.state.get();
                state.products.clone_from(&list.items);
                state.loading = false;
                self.state.set(state);
                self.state.emit(AppEvent::CatalogLoaded {
                    products: list.items,
                });
            }
            Err(err) => {
                let mut state = self.state.get();
                state.loading = false;
                self.state.set(state);
                warn!(error = %err, "catalog load failed");
                self.state.emit(AppEvent::CatalogError {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Record a selection. Unknown ids are legal and simply resolve to no
    /// selected product.
    pub fn select_product(&self, id: ProductId) {
        let mut state = self.state.get();
        state.selected = Some(id);
        self.state.set(state);
    }

    /// The product the current selection resolves to, if any.
    #[must_use]
    pub fn selected_product(&self) -> Option<Product> {
        let state = self.state.get();
        let selected = state.selected?;
        state.products.into_iter().find(|p| p.id == selected)
    }

    /// All products in server order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.state.get().products
    }

    /// Look up one product by id.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.state.get().products.into_iter().find(|p| &p.id == id)
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.get().loading
    }

    /// Derive the display projection for one product.
    ///
    /// All product formatting (category buckets, price labels, image URL
    /// resolution) is centralized here; multiple view types consume the
    /// same projection.
    #[must_use]
    pub fn to_view_model(&self, product: &Product) -> ProductViewModel {
        let bucket = CategoryBucket::from_label(product.category.as_deref());
        ProductViewModel {
            id: product.id.clone(),
            title: product.title.clone(),
            category_label: product
                .category
                .clone()
                .unwrap_or_else(|| "other".to_owned()),
            category_class: bucket.css_class().to_owned(),
            image_url: self.image_url(product.image.as_deref()),
            price_label: price_label(product.price.as_ref()),
            is_buyable: product.price.is_some(),
        }
    }

    /// Display projections for the whole catalog, in server order.
    #[must_use]
    pub fn all_view_models(&self) -> Vec<ProductViewModel> {
        self.state
            .get()
            .products
            .iter()
            .map(|p| self.to_view_model(p))
            .collect()
    }

    fn image_url(&self, image: Option<&str>) -> String {
        image.map_or_else(
            || PLACEHOLDER_IMAGE.to_owned(),
            |path| {
                let base = self.cdn_base.trim_end_matches('/');
                if path.starts_with('/') {
                    format!("{base}{path}")
                } else {
                    format!("{base}/{path}")
                }
            },
        )
    }
}
