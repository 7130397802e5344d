//! Fruit Porter Core - Shared types library.
//!
//! This crate provides common types used across all Fruit Porter components:
//! - `server` - JSON HTTP API (storefront, cart, orders, admin console)
//! - `integration-tests` - end-to-end API scenarios
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, order numbers,
//!   and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
