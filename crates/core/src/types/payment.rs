//! Payment method selection.

use serde::{Deserialize, Serialize};

/// How the buyer pays for an order.
///
/// `Card` and `Cash` are what the checkout form offers; `Online` exists
/// because some backend deployments expect it in place of `card` (the
/// order request performs that remap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
    Online,
}

impl PaymentMethod {
    /// The value sent to the backend: `card` is translated to `online` for
    /// compatibility, `cash` and `online` pass through unchanged.
    #[must_use]
    pub const fn for_backend(self) -> Self {
        match self {
            Self::Card | Self::Online => Self::Online,
            Self::Cash => Self::Cash,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).unwrap(),
            "\"card\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Online).unwrap(),
            "\"online\""
        );
    }

    #[test]
    fn test_backend_remap() {
        assert_eq!(PaymentMethod::Card.for_backend(), PaymentMethod::Online);
        assert_eq!(PaymentMethod::Cash.for_backend(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::Online.for_backend(), PaymentMethod::Online);
    }
}
