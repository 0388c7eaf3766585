//! Integration tests for Tavola.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tavola-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart` - Cart behavior across simulated page reloads
//! - `favorites` - Favorites behavior across simulated page reloads
//! - `tenant` - Tenant directory files and URL resolution
//! - `app_state` - Stores wired through `AppState`
//!
//! Each test gets its own temporary data directory, so tests can run in
//! parallel.

use std::path::Path;

use rust_decimal::Decimal;
use tavola_core::{Product, ProductId};
use tavola_storefront::FileStorage;

/// A product priced in cents.
#[must_use]
pub fn product(id: i64, name: &str, cents: i64) -> Product {
    Product::new(ProductId::new(id), name, Decimal::new(cents, 2))
}

/// File storage rooted at `dir`, as a fresh page load would open it.
#[must_use]
pub fn reload(dir: &Path) -> FileStorage {
    FileStorage::new(dir)
}
