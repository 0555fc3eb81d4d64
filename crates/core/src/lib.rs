//! Synapse Market Core - Shared types library.
//!
//! This crate provides common types used across all Synapse Market components:
//! - `storefront` - Event-driven storefront state layer and backend client
//! - `integration-tests` - End-to-end checkout scenarios
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no event
//! plumbing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, contact fields,
//!   and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
