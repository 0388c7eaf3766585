//! Menu product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductId;

/// A product from a tenant's menu.
///
/// Only the fields the stores depend on are typed. Everything else the
/// catalog attaches (description, image, category, allergens, ...) is kept
/// verbatim in `extra` so a persisted snapshot reloads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Unit price. Accepts a JSON number or a decimal string.
    #[serde(default)]
    pub price: Decimal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// JSON keys of the typed fields.
    pub const TYPED_FIELDS: [&'static str; 3] = ["id", "name", "price"];

    /// Create a product with no extra catalog fields.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            extra: Map::new(),
        }
    }

    /// Attach an extra catalog field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Drop extra fields named like a typed field or like one of `reserved`.
    ///
    /// A record that flattens a product next to its own fields (`quantity`,
    /// `tenantId`) must not carry those keys in `extra` too, or the
    /// serialized object repeats them.
    #[must_use]
    pub fn without_extra_keys(mut self, reserved: &[&str]) -> Self {
        for key in Self::TYPED_FIELDS.iter().chain(reserved) {
            self.extra.remove(*key);
        }
        self
    }
}
