//! Tavola Storefront library.
//!
//! Client-side state for a customer visiting a restaurant: the cart, the
//! favorites list, and the tenant/table the visit belongs to.
//!
//! # Modules
//!
//! - [`storage`] - Key-value persistence (memory and file backends)
//! - [`cart`] - Cart store with write-through persistence
//! - [`favorites`] - Favorites store with write-through persistence
//! - [`tenant`] - Tenant directory and URL resolution
//! - [`state`] - Application state wired at startup
//! - [`config`] - Environment configuration
//! - [`error`] - Application error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod favorites;
pub mod state;
pub mod storage;
pub mod tenant;

pub use cart::{CartLine, CartStore};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use favorites::{Favorite, FavoriteProduct, FavoritesStore};
pub use state::{AppState, StateError};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use tenant::{Resolution, TenantDirectory, TenantResolver, TenantSource};
