//! Application state wired once at startup.
//!
//! `AppState` owns the stores and the tenant resolver and is handed by
//! reference to whatever needs them. Stores are mounted explicitly through
//! [`AppStateBuilder`]; reaching for a store that was never mounted is a
//! programming mistake and surfaces as [`StateError::NotConfigured`].

use thiserror::Error;

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::favorites::FavoritesStore;
use crate::storage::Storage;
use crate::tenant::{TenantDirectory, TenantResolver};

/// Error accessing application state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The named store was not mounted when the state was built.
    #[error("{0} store accessed before it was configured")]
    NotConfigured(&'static str),
}

/// Stores, resolver, and configuration for one running application.
#[derive(Debug)]
pub struct AppState<S: Storage> {
    config: StorefrontConfig,
    resolver: TenantResolver,
    cart: Option<CartStore<S>>,
    favorites: Option<FavoritesStore<S>>,
}

impl<S: Storage> AppState<S> {
    /// Start building application state.
    #[must_use]
    pub fn builder(config: StorefrontConfig, directory: TenantDirectory) -> AppStateBuilder<S> {
        AppStateBuilder {
            resolver: TenantResolver::new(directory, config.resolver.clone()),
            config,
            cart: None,
            favorites: None,
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the tenant resolver.
    #[must_use]
    pub const fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// Get the cart store.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotConfigured` if no cart was mounted.
    pub fn cart(&self) -> Result<&CartStore<S>, StateError> {
        self.cart.as_ref().ok_or(StateError::NotConfigured("cart"))
    }

    /// Get the cart store for mutation.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotConfigured` if no cart was mounted.
    pub fn cart_mut(&mut self) -> Result<&mut CartStore<S>, StateError> {
        self.cart.as_mut().ok_or(StateError::NotConfigured("cart"))
    }

    /// Get the favorites store.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotConfigured` if no favorites store was mounted.
    pub fn favorites(&self) -> Result<&FavoritesStore<S>, StateError> {
        self.favorites
            .as_ref()
            .ok_or(StateError::NotConfigured("favorites"))
    }

    /// Get the favorites store for mutation.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotConfigured` if no favorites store was mounted.
    pub fn favorites_mut(&mut self) -> Result<&mut FavoritesStore<S>, StateError> {
        self.favorites
            .as_mut()
            .ok_or(StateError::NotConfigured("favorites"))
    }
}

/// Builder for [`AppState`].
#[derive(Debug)]
pub struct AppStateBuilder<S: Storage> {
    config: StorefrontConfig,
    resolver: TenantResolver,
    cart: Option<CartStore<S>>,
    favorites: Option<FavoritesStore<S>>,
}

impl<S: Storage> AppStateBuilder<S> {
    /// Mount a cart loaded from `storage`.
    #[must_use]
    pub fn with_cart(mut self, storage: S) -> Self {
        self.cart = Some(CartStore::load(storage));
        self
    }

    /// Mount a favorites store loaded from `storage`.
    #[must_use]
    pub fn with_favorites(mut self, storage: S) -> Self {
        self.favorites = Some(FavoritesStore::load(storage));
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> AppState<S> {
        tracing::debug!(
            cart = self.cart.is_some(),
            favorites = self.favorites.is_some(),
            tenants = self.resolver.directory().len(),
            "Application state built"
        );
        AppState {
            config: self.config,
            resolver: self.resolver,
            cart: self.cart,
            favorites: self.favorites,
        }
    }
}
