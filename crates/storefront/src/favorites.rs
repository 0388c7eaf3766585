//! Favorites ("liked products") store.
//!
//! Favorites are a set keyed by product ID. An entry is either a bare ID or a
//! full product tagged with the tenant it was liked on; only the latter show
//! up in product listings.

use serde::{Deserialize, Serialize};

use tavola_core::{Product, ProductId, TenantId};

use crate::storage::{FAVORITES_KEY, Storage, load_or_default, persist};

/// JSON key of the tenant tag, stored next to the product fields.
const TENANT_ID_FIELD: &str = "tenantId";

/// A favorited product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FavoriteRepr", into = "FavoriteRepr")]
pub enum Favorite {
    /// Only the ID is known. Persisted as a bare number.
    ById(ProductId),
    /// A full product, optionally tagged with its tenant. Persisted as the
    /// product object with a `tenantId` field.
    ByObject {
        product: Product,
        tenant_id: Option<TenantId>,
    },
}

impl Favorite {
    /// Favorite a full product liked on `tenant_id`.
    ///
    /// A `tenantId` among the product's extra fields is dropped; only
    /// `tenant_id` tags the entry.
    #[must_use]
    pub fn product(product: Product, tenant_id: Option<TenantId>) -> Self {
        Self::ByObject {
            product: product.without_extra_keys(&[TENANT_ID_FIELD]),
            tenant_id,
        }
    }

    /// The product ID, whichever variant this is.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match self {
            Self::ById(id) => *id,
            Self::ByObject { product, .. } => product.id,
        }
    }

    /// The tenant tag, if this entry has one.
    #[must_use]
    pub const fn tenant_id(&self) -> Option<&TenantId> {
        match self {
            Self::ById(_) => None,
            Self::ByObject { tenant_id, .. } => tenant_id.as_ref(),
        }
    }
}

impl From<ProductId> for Favorite {
    fn from(id: ProductId) -> Self {
        Self::ById(id)
    }
}

/// A full-object favorite borrowed out of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteProduct<'a> {
    pub product: &'a Product,
    pub tenant_id: Option<&'a TenantId>,
}

/// On-disk shape: a bare ID or a product object with an optional tenant.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FavoriteRepr {
    Id(ProductId),
    Object(FavoriteObject),
}

#[derive(Serialize, Deserialize)]
struct FavoriteObject {
    #[serde(flatten)]
    product: Product,
    #[serde(rename = "tenantId", default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<TenantId>,
}

impl From<FavoriteRepr> for Favorite {
    fn from(repr: FavoriteRepr) -> Self {
        match repr {
            FavoriteRepr::Id(id) => Self::ById(id),
            FavoriteRepr::Object(FavoriteObject { product, tenant_id }) => {
                Self::ByObject { product, tenant_id }
            }
        }
    }
}

impl From<Favorite> for FavoriteRepr {
    fn from(favorite: Favorite) -> Self {
        match favorite {
            Favorite::ById(id) => Self::Id(id),
            Favorite::ByObject { product, tenant_id } => {
                Self::Object(FavoriteObject { product, tenant_id })
            }
        }
    }
}

/// Favorites state mirrored into a [`Storage`].
#[derive(Debug)]
pub struct FavoritesStore<S: Storage> {
    storage: S,
    entries: Vec<Favorite>,
}

impl<S: Storage> FavoritesStore<S> {
    /// Load favorites from storage.
    ///
    /// A missing or unreadable snapshot yields an empty set.
    pub fn load(storage: S) -> Self {
        let entries: Vec<Favorite> = load_or_default(&storage, FAVORITES_KEY).into_value();
        tracing::debug!(entries = entries.len(), "Favorites loaded");
        Self { storage, entries }
    }

    /// Flip membership of `favorite`'s product.
    ///
    /// If any entry has the same product ID it is removed, whatever its
    /// variant or tenant; otherwise `favorite` is inserted as given.
    /// Returns whether the product is a favorite afterwards.
    pub fn toggle(&mut self, favorite: impl Into<Favorite>) -> bool {
        let favorite = match favorite.into() {
            Favorite::ByObject { product, tenant_id } => Favorite::product(product, tenant_id),
            by_id @ Favorite::ById(_) => by_id,
        };
        let product_id = favorite.product_id();

        let now_favorite =
            if let Some(pos) = self.entries.iter().position(|e| e.product_id() == product_id) {
                self.entries.remove(pos);
                tracing::debug!(%product_id, "Removed favorite");
                false
            } else {
                tracing::debug!(
                    %product_id,
                    tenant_id = favorite.tenant_id().map(TenantId::as_str),
                    "Added favorite"
                );
                self.entries.push(favorite);
                true
            };

        self.save();
        now_favorite
    }

    /// Whether `product_id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id() == product_id)
    }

    /// Favorites stored as full products. Bare-ID entries are skipped.
    #[must_use]
    pub fn list_favorite_objects(&self) -> Vec<FavoriteProduct<'_>> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Favorite::ById(_) => None,
                Favorite::ByObject { product, tenant_id } => Some(FavoriteProduct {
                    product,
                    tenant_id: tenant_id.as_ref(),
                }),
            })
            .collect()
    }

    /// Full-product favorites liked on `tenant_id`.
    #[must_use]
    pub fn list_by_tenant(&self, tenant_id: &TenantId) -> Vec<FavoriteProduct<'_>> {
        self.list_favorite_objects()
            .into_iter()
            .filter(|fav| fav.tenant_id == Some(tenant_id))
            .collect()
    }

    /// Remove every favorite. The snapshot becomes an empty list.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
        tracing::debug!("Favorites cleared");
    }

    /// Remove the full-product favorites tagged with `tenant_id`.
    ///
    /// Bare IDs and other tenants' favorites stay.
    pub fn clear_by_tenant(&mut self, tenant_id: &TenantId) {
        let before = self.entries.len();
        self.entries.retain(|e| e.tenant_id() != Some(tenant_id));
        tracing::debug!(
            %tenant_id,
            removed = before - self.entries.len(),
            "Cleared tenant favorites"
        );
        self.save();
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Favorite] {
        &self.entries
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) {
        if let Err(e) = persist(&self.storage, FAVORITES_KEY, &self.entries) {
            tracing::warn!(error = %e, "Failed to persist favorites");
        }
    }
}
