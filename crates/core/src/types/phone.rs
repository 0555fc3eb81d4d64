//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with the +7 country code.
    #[error("phone number must start with +7")]
    MissingCountryCode,
    /// The number does not match the `+7 (DDD) DDD-DD-DD` mask.
    #[error("phone number must match +7 (DDD) DDD-DD-DD")]
    MalformedMask,
}

/// A phone number in the fixed `+7 (DDD) DDD-DD-DD` form.
///
/// The single spaces around the parenthesized block are optional; everything
/// else is exact. This matches the checkout form input mask, nothing more.
///
/// ## Examples
///
/// ```
/// use synapse_market_core::Phone;
///
/// assert!(Phone::parse("+7 (123) 456-78-90").is_ok());
/// assert!(Phone::parse("+7(123)456-78-90").is_ok());
///
/// assert!(Phone::parse("8 (123) 456-78-90").is_err()); // wrong prefix
/// assert!(Phone::parse("+7 (123) 4567890").is_err());  // missing dashes
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, lacks the `+7`
    /// prefix, or does not match the mask.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let rest = s.strip_prefix("+7").ok_or(PhoneError::MissingCountryCode)?;

        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let rest = rest.strip_prefix('(').ok_or(PhoneError::MalformedMask)?;
        let rest = strip_digits(rest, 3).ok_or(PhoneError::MalformedMask)?;
        let rest = rest.strip_prefix(')').ok_or(PhoneError::MalformedMask)?;
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let rest = strip_digits(rest, 3).ok_or(PhoneError::MalformedMask)?;
        let rest = rest.strip_prefix('-').ok_or(PhoneError::MalformedMask)?;
        let rest = strip_digits(rest, 2).ok_or(PhoneError::MalformedMask)?;
        let rest = rest.strip_prefix('-').ok_or(PhoneError::MalformedMask)?;
        let rest = strip_digits(rest, 2).ok_or(PhoneError::MalformedMask)?;

        if !rest.is_empty() {
            return Err(PhoneError::MalformedMask);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Strip exactly `count` ASCII digits from the front of `s`.
fn strip_digits(s: &str, count: usize) -> Option<&str> {
    let mut chars = s.chars();
    for _ in 0..count {
        if !chars.next()?.is_ascii_digit() {
            return None;
        }
    }
    Some(chars.as_str())
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(Phone::parse("+7 (123) 456-78-90").is_ok());
        assert!(Phone::parse("+7(123)456-78-90").is_ok());
        assert!(Phone::parse("+7 (999) 000-11-22").is_ok());
        assert!(Phone::parse("+7(123) 456-78-90").is_ok());
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let phone = Phone::parse("  +7 (123) 456-78-90 ").unwrap();
        assert_eq!(phone.as_str(), "+7 (123) 456-78-90");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_wrong_country_code() {
        assert!(matches!(
            Phone::parse("8 (123) 456-78-90"),
            Err(PhoneError::MissingCountryCode)
        ));
        assert!(matches!(
            Phone::parse("+1 (123) 456-78-90"),
            Err(PhoneError::MissingCountryCode)
        ));
    }

    #[test]
    fn test_parse_malformed_mask() {
        assert!(matches!(
            Phone::parse("+7 (123) 4567890"),
            Err(PhoneError::MalformedMask)
        ));
        assert!(matches!(
            Phone::parse("+7 (12) 456-78-90"),
            Err(PhoneError::MalformedMask)
        ));
        assert!(matches!(
            Phone::parse("+7 123 456-78-90"),
            Err(PhoneError::MalformedMask)
        ));
        assert!(matches!(
            Phone::parse("+7 (123) 456-78-901"),
            Err(PhoneError::MalformedMask)
        ));
        // Only single optional spaces around the parenthesized block
        assert!(matches!(
            Phone::parse("+7  (123) 456-78-90"),
            Err(PhoneError::MalformedMask)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+7 (123) 456-78-90").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+7 (123) 456-78-90\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
