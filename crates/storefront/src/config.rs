//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKET_API_URL` - Backend API origin (e.g., `https://api.example.com/shop`)
//! - `MARKET_CDN_URL` - CDN origin for product images
//!
//! The binary loads a `.env` file via `dotenvy` before reading these.

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Backend API origin.
    pub api_base: Url,
    /// CDN origin for product images.
    pub cdn_base: Url,
}

impl MarketConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or not a valid
    /// URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: require_url("MARKET_API_URL")?,
            cdn_base: require_url("MARKET_CDN_URL")?,
        })
    }
}

fn require_url(name: &str) -> Result<Url, ConfigError> {
    let value =
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}
