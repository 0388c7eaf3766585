//! Tavola Core - Shared domain types.
//!
//! This crate provides the types used across all Tavola components:
//! - `storefront` - Cart, favorites, and tenant resolution
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no storage, no
//! URL handling, no logging. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, tenants, and slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
