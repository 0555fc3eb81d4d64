//! Order draft model with staged validation.
//!
//! The draft moves through three coarse phases driven by field setters, not
//! explicit transitions: shipping (payment + address), contact (email +
//! phone), then submit-ready. Shipping setters broadcast the step-scoped
//! validation result, contact setters the full one; subscribers must
//! re-derive whichever scope they need rather than rely on which fired.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use synapse_market_core::{Email, EmailError, PaymentMethod, Phone, PhoneError};
use thiserror::Error;

use super::base::ModelState;
use super::basket::BasketItem;
use crate::api::OrderRequest;
use crate::events::{AppEvent, EventBus};

/// The in-progress order, each field optional until filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub payment: Option<PaymentMethod>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Per-field validation messages; absent means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ValidationErrors {
    /// True when no field carries a message.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.payment.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

/// Outcome of a validation pass over some scope of the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: ValidationErrors,
}

impl ValidationResult {
    fn from_errors(errors: ValidationErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Contract violations when building the backend request from an
/// incomplete or malformed draft.
#[derive(Debug, Error)]
pub enum OrderDraftError {
    #[error("no payment method selected")]
    MissingPayment,
    #[error("shipping address is empty")]
    MissingAddress,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),
}

const PAYMENT_REQUIRED: &str = "Select a payment method";
const ADDRESS_REQUIRED: &str = "Enter the shipping address";
const EMAIL_INVALID: &str = "Enter a valid email";
const PHONE_INVALID: &str = "Enter a valid phone number";

/// Owns the order draft, its validation, and the mapping to the backend
/// request shape.
pub struct OrderModel {
    state: ModelState<OrderDraft>,
    /// Read-only snapshot of the basket at the last `basket:changed`,
    /// cloned defensively so later basket mutations cannot alias into a
    /// submission in progress.
    attached: Mutex<Vec<BasketItem>>,
}

impl OrderModel {
    /// Create an empty draft bound to the bus.
    pub fn new(bus: EventBus) -> Self {
        Self {
            state: ModelState::new(bus, OrderDraft::default()),
            attached: Mutex::new(Vec::new()),
        }
    }

    /// Set the payment method and broadcast the shipping-step validation.
    pub fn set_payment(&self, method: PaymentMethod) {
        let mut draft = self.state.get();
        draft.payment = Some(method);
        self.state.set(draft);
        self.emit_changed(self.validate_order_step());
    }

    /// Set the shipping address and broadcast the shipping-step validation.
    pub fn set_address(&self, value: impl Into<String>) {
        let mut draft = self.state.get();
        draft.address = Some(value.into());
        self.state.set(draft);
        self.emit_changed(self.validate_order_step());
    }

    /// Set whichever contact fields are present and broadcast the full
    /// validation.
    pub fn set_contacts(&self, email: Option<String>, phone: Option<String>) {
        let mut draft = self.state.get();
        if let Some(email) = email {
            draft.email = Some(email);
        }
        if let Some(phone) = phone {
            draft.phone = Some(phone);
        }
        self.state.set(draft);
        self.emit_changed(self.validate());
    }

    /// Store a defensive snapshot of the basket for total computation at
    /// submission time.
    pub fn attach_basket(&self, items: &[BasketItem]) {
        *self.attached() = items.to_vec();
    }

    /// Validate all four fields.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let draft = self.state.get();
        let mut errors = Self::shipping_errors(&draft);
        let contact = Self::contact_errors(&draft);
        errors.email = contact.email;
        errors.phone = contact.phone;
        ValidationResult::from_errors(errors)
    }

    /// Validate only payment and address; contact fields never affect the
    /// result.
    #[must_use]
    pub fn validate_order_step(&self) -> ValidationResult {
        ValidationResult::from_errors(Self::shipping_errors(&self.state.get()))
    }

    /// Validate only email and phone; shipping fields never affect the
    /// result.
    #[must_use]
    pub fn validate_contacts_step(&self) -> ValidationResult {
        ValidationResult::from_errors(Self::contact_errors(&self.state.get()))
    }

    /// Build the backend request.
    ///
    /// # Errors
    ///
    /// Fails fast with a typed error when any required field is missing or
    /// malformed; malformed requests must never reach the wire.
    pub fn to_request_dto(&self) -> Result<OrderRequest, OrderDraftError> {
        let draft = self.state.get();

        let payment = draft.payment.ok_or(OrderDraftError::MissingPayment)?;
        let address = draft
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(OrderDraftError::MissingAddress)?
            .to_owned();
        let email = Email::parse(draft.email.as_deref().unwrap_or_default())?;
        let phone = Phone::parse(draft.phone.as_deref().unwrap_or_default())?;

        let attached = self.attached().clone();
        let total = attached
            .iter()
            .filter_map(|item| item.product.price.as_ref())
            .map(|price| price.amount())
            .sum();

        Ok(OrderRequest {
            items: attached
                .into_iter()
                .map(|item| item.product.id)
                .collect(),
            payment: payment.for_backend(),
            address,
            email,
            phone,
            total,
        })
    }

    /// Clear the draft back to empty and broadcast the full validation.
    pub fn reset(&self) {
        self.state.set(OrderDraft::default());
        self.emit_changed(self.validate());
    }

    /// Current payment selection.
    #[must_use]
    pub fn payment(&self) -> Option<PaymentMethod> {
        self.state.get().payment
    }

    /// Current address, as typed.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.state.get().address
    }

    /// Current email, as typed.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.state.get().email
    }

    /// Current phone, as typed.
    #[must_use]
    pub fn phone(&self) -> Option<String> {
        self.state.get().phone
    }

    fn shipping_errors(draft: &OrderDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if draft.payment.is_none() {
            errors.payment = Some(PAYMENT_REQUIRED.to_owned());
        }
        if draft
            .address
            .as_deref()
            .is_none_or(|a| a.trim().is_empty())
        {
            errors.address = Some(ADDRESS_REQUIRED.to_owned());
        }
        errors
    }

    fn contact_errors(draft: &OrderDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if draft
            .email
            .as_deref()
            .is_none_or(|e| Email::parse(e).is_err())
        {
            errors.email = Some(EMAIL_INVALID.to_owned());
        }
        if draft
            .phone
            .as_deref()
            .is_none_or(|p| Phone::parse(p).is_err())
        {
            errors.phone = Some(PHONE_INVALID.to_owned());
        }
        errors
    }

    fn emit_changed(&self, validation: ValidationResult) {
        self.state.emit(AppEvent::OrderChanged {
            draft: self.state.get(),
            validation,
        });
    }

    fn attached(&self) -> std::sync::MutexGuard<'_, Vec<BasketItem>> {
        self.attached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;
    use synapse_market_core::{Price, ProductId};

    use super::*;
    use crate::api::Product;
    use crate::events::EventKind;

    fn item(id: &str, price: Option<i64>) -> BasketItem {
        BasketItem {
            product: Product {
                id: ProductId::new(id),
                title: format!("Product {id}"),
                description: None,
                category: None,
                image: None,
                price: price.map(Price::from),
            },
        }
    }

    fn filled_order() -> OrderModel {
        let order = OrderModel::new(EventBus::new());
        order.set_payment(PaymentMethod::Card);
        order.set_address("1 Infinite Loop");
        order.set_contacts(
            Some("a@b.co".to_owned()),
            Some("+7 (123) 456-78-90".to_owned()),
        );
        order
    }

    #[test]
    fn test_order_step_ignores_contact_fields() {
        let order = OrderModel::new(EventBus::new());
        order.set_payment(PaymentMethod::Cash);
        order.set_address("Somewhere 5");
        order.set_contacts(Some("garbage".to_owned()), Some("000".to_owned()));

        let result = order.validate_order_step();
        assert!(result.valid, "garbage contacts must not affect the step");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_contacts_step_ignores_shipping_fields() {
        let order = OrderModel::new(EventBus::new());
        order.set_contacts(
            Some("a@b.co".to_owned()),
            Some("+7 (123) 456-78-90".to_owned()),
        );

        let result = order.validate_contacts_step();
        assert!(result.valid, "missing shipping must not affect the step");
    }

    #[test]
    fn test_full_validation_reports_every_missing_field() {
        let order = OrderModel::new(EventBus::new());
        let result = order.validate();

        assert!(!result.valid);
        assert!(result.errors.payment.is_some());
        assert!(result.errors.address.is_some());
        assert!(result.errors.email.is_some());
        assert!(result.errors.phone.is_some());
    }

    #[test]
    fn test_blank_address_is_invalid() {
        let order = OrderModel::new(EventBus::new());
        order.set_address("   ");
        assert!(order.validate_order_step().errors.address.is_some());
    }

    #[test]
    fn test_setters_emit_changed_with_the_appropriate_scope() {
        let bus = EventBus::new();
        let results = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&results);
        bus.on(EventKind::OrderChanged, move |event| {
            if let AppEvent::OrderChanged { validation, .. } = event {
                sink.lock().unwrap().push(validation.clone());
            }
        });

        let order = OrderModel::new(bus);
        order.set_payment(PaymentMethod::Card);
        order.set_contacts(Some("a@b.co".to_owned()), None);

        let results = results.lock().unwrap();
        assert_eq!(results.len(), 2);
        // Shipping-step scope: no email error even though email is unset.
        let step = results.first().unwrap();
        assert!(step.errors.email.is_none());
        assert!(step.errors.address.is_some());
        // Full scope: the missing phone now shows up.
        let full = results.get(1).unwrap();
        assert!(full.errors.phone.is_some());
        assert!(full.errors.address.is_some());
    }

    #[test]
    fn test_dto_total_and_payment_remap() {
        let order = filled_order();
        order.attach_basket(&[item("p-1", Some(100)), item("p-2", None)]);

        let dto = order.to_request_dto().unwrap();
        assert_eq!(dto.total, Decimal::from(100));
        assert_eq!(dto.payment, PaymentMethod::Online);
        assert_eq!(
            dto.items,
            vec![ProductId::new("p-1"), ProductId::new("p-2")]
        );
        assert_eq!(dto.address, "1 Infinite Loop");
    }

    #[test]
    fn test_dto_preserves_cash() {
        let order = filled_order();
        order.set_payment(PaymentMethod::Cash);
        order.attach_basket(&[item("p-1", Some(10))]);

        let dto = order.to_request_dto().unwrap();
        assert_eq!(dto.payment, PaymentMethod::Cash);
    }

    #[test]
    fn test_dto_fails_fast_on_incomplete_draft() {
        let order = OrderModel::new(EventBus::new());
        assert!(matches!(
            order.to_request_dto(),
            Err(OrderDraftError::MissingPayment)
        ));

        order.set_payment(PaymentMethod::Card);
        assert!(matches!(
            order.to_request_dto(),
            Err(OrderDraftError::MissingAddress)
        ));

        order.set_address("1 Infinite Loop");
        assert!(matches!(
            order.to_request_dto(),
            Err(OrderDraftError::InvalidEmail(_))
        ));

        order.set_contacts(Some("a@b.co".to_owned()), Some("bogus".to_owned()));
        assert!(matches!(
            order.to_request_dto(),
            Err(OrderDraftError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_attach_basket_snapshots_defensively() {
        let order = filled_order();
        let items = vec![item("p-1", Some(100))];
        order.attach_basket(&items);

        // Re-attaching a different list is the only way to change the total.
        drop(items);
        let dto = order.to_request_dto().unwrap();
        assert_eq!(dto.total, Decimal::from(100));

        order.attach_basket(&[]);
        let dto = order.to_request_dto().unwrap();
        assert_eq!(dto.total, Decimal::ZERO);
        assert!(dto.items.is_empty());
    }

    #[test]
    fn test_reset_clears_draft() {
        let order = filled_order();
        order.reset();

        assert!(order.payment().is_none());
        assert!(order.address().is_none());
        assert!(order.email().is_none());
        assert!(order.phone().is_none());
        assert!(!order.validate().valid);
    }
}
