//! Core types for Tavola.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod slug;
pub mod tenant;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use slug::{Slug, SlugError, is_valid_slug_format, slugify};
pub use tenant::{Tenant, TenantStatus};
