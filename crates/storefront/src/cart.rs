//! Shopping cart store.
//!
//! The cart is an ordered list of line items keyed by product ID. Every
//! mutation writes the whole list through to storage under [`CART_KEY`], so
//! the persisted snapshot always matches memory once a call returns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{Product, ProductId};

use crate::storage::{CART_KEY, Storage, load_or_default, persist};

/// JSON key the line's quantity is stored under, next to the product fields.
const QUANTITY_FIELD: &str = "quantity";

/// One row in the cart: a product snapshot and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product as it was when first added; `price` is the unit price snapshot.
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1 while the line is stored.
    pub quantity: u32,
}

impl CartLine {
    /// The line's product ID.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity`, saturating at the bounds of `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Cart state mirrored into a [`Storage`].
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: Storage> CartStore<S> {
    /// Load the cart from storage.
    ///
    /// A missing or unreadable snapshot yields an empty cart.
    pub fn load(storage: S) -> Self {
        let lines: Vec<CartLine> = load_or_default(&storage, CART_KEY).into_value();
        tracing::debug!(lines = lines.len(), "Cart loaded");
        Self { storage, lines }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for `product.id`, or appends a new line
    /// with quantity 1. Extra catalog fields that clash with the line's own
    /// keys are dropped from the stored snapshot.
    pub fn add(&mut self, product: Product) {
        let product_id = product.id;
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(%product_id, quantity = line.quantity, "Incremented cart line");
        } else {
            self.lines.push(CartLine {
                product: product.without_extra_keys(&[QUANTITY_FIELD]),
                quantity: 1,
            });
            tracing::debug!(%product_id, "Added cart line");
        }
        self.save();
    }

    /// Remove the line for `product_id`. Does nothing if there is none.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        if self.lines.len() != before {
            tracing::debug!(%product_id, "Removed cart line");
        }
        self.save();
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity of 0 removes the line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
            tracing::debug!(%product_id, quantity, "Updated cart line quantity");
        }
        self.save();
    }

    /// Empty the cart and erase the persisted snapshot.
    pub fn clear(&mut self) {
        self.lines.clear();
        if let Err(e) = self.storage.remove(CART_KEY) {
            tracing::warn!(error = %e, "Failed to erase cart snapshot");
        }
        tracing::debug!("Cart cleared");
    }

    /// Sum of `price × quantity` over all lines; zero for an empty cart.
    ///
    /// Saturates at `Decimal::MAX` (or `MIN`) instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Number of items (sum of quantities, not lines).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    fn save(&self) {
        if let Err(e) = persist(&self.storage, CART_KEY, &self.lines) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn margherita() -> Product {
        Product::new(ProductId::new(1), "Margherita", Decimal::new(850, 2))
    }

    fn diavola() -> Product {
        Product::new(ProductId::new(2), "Diavola", Decimal::new(1200, 2))
    }

    fn snapshot(storage: &MemoryStorage) -> Vec<CartLine> {
        serde_json::from_str(&storage.get(CART_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = CartStore::load(MemoryStorage::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(margherita());
        cart.add(margherita());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.total(), Decimal::new(1700, 2));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_mixed_products_total_and_count() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(margherita());
        cart.add(diavola());
        cart.add(margherita());

        assert_eq!(cart.total(), Decimal::new(2900, 2));
        assert_eq!(cart.count(), 3);
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id().as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_repeat_add_keeps_first_price_snapshot() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(margherita());
        cart.add(Product::new(ProductId::new(1), "Margherita", Decimal::new(900, 2)));
        assert_eq!(cart.line(ProductId::new(1)).unwrap().product.price, Decimal::new(850, 2));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(margherita());
        cart.remove(ProductId::new(99));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_then_zero_empties_cart() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(margherita());
        cart.update_quantity(ProductId::new(1), 5);
        assert_eq!(cart.count(), 5);
        cart.update_quantity(ProductId::new(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_product_is_ignored() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.update_quantity(ProductId::new(4), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_zero_matches_remove() {
        let mut via_update = CartStore::load(MemoryStorage::new());
        let mut via_remove = CartStore::load(MemoryStorage::new());
        for cart in [&mut via_update, &mut via_remove] {
            cart.add(margherita());
            cart.add(diavola());
        }

        via_update.update_quantity(ProductId::new(1), 0);
        via_remove.remove(ProductId::new(1));

        assert_eq!(via_update.lines(), via_remove.lines());
        assert_eq!(
            via_update.storage().get(CART_KEY).unwrap(),
            via_remove.storage().get(CART_KEY).unwrap()
        );
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::load(storage.clone());

        cart.add(margherita());
        assert_eq!(snapshot(&storage), cart.lines());
        cart.add(diavola());
        assert_eq!(snapshot(&storage), cart.lines());
        cart.update_quantity(ProductId::new(2), 4);
        assert_eq!(snapshot(&storage), cart.lines());
        cart.remove(ProductId::new(1));
        assert_eq!(snapshot(&storage), cart.lines());
    }

    #[test]
    fn test_clear_removes_snapshot_key() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::load(storage.clone());
        cart.add(margherita());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_reload_reproduces_lines() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::load(storage.clone());
        cart.add(margherita().with_field("category", "pizza"));
        cart.add(diavola());
        cart.add(diavola());

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.lines(), cart.lines());
        assert_eq!(reloaded.total(), cart.total());
    }

    #[test]
    fn test_catalog_quantity_field_does_not_break_reload() {
        let storage = MemoryStorage::new();
        let product: Product = serde_json::from_value(
            json!({"id": 1, "name": "Margherita", "price": 8.5, "quantity": 50, "image": "m.jpg"}),
        )
        .unwrap();
        let mut cart = CartStore::load(storage.clone());
        cart.add(product);

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.lines(), cart.lines());
        let line = reloaded.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 1);
        assert!(!line.product.extra.contains_key("quantity"));
        assert_eq!(line.product.extra["image"], "m.jpg");
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add(Product::new(ProductId::new(1), "Caviar", Decimal::MAX));
        cart.update_quantity(ProductId::new(1), 2);
        assert_eq!(cart.lines()[0].subtotal(), Decimal::MAX);
        assert_eq!(cart.total(), Decimal::MAX);

        cart.add(Product::new(ProductId::new(2), "Truffle", Decimal::MAX));
        assert_eq!(cart.total(), Decimal::MAX);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_loads_snapshot_with_numeric_prices() {
        let storage = MemoryStorage::new();
        let raw = json!([{"id": 1, "name": "Margherita", "price": 8.5, "quantity": 2, "image": "m.jpg"}]);
        storage.set(CART_KEY, &raw.to_string()).unwrap();

        let cart = CartStore::load(storage);
        assert_eq!(cart.total(), Decimal::new(17, 0));
        assert_eq!(cart.lines()[0].product.extra["image"], "m.jpg");
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "not json at all").unwrap();
        let cart = CartStore::load(storage);
        assert!(cart.is_empty());
    }

    proptest! {
        #[test]
        fn prop_count_equals_number_of_adds(adds in 1_u32..50) {
            let mut cart = CartStore::load(MemoryStorage::new());
            for _ in 0..adds {
                cart.add(margherita());
            }
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.count(), u64::from(adds));
            prop_assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, adds);
        }

        #[test]
        fn prop_total_is_sum_of_subtotals(quantities in proptest::collection::vec(1_u32..20, 1..6)) {
            let mut cart = CartStore::load(MemoryStorage::new());
            let mut expected = Decimal::ZERO;
            for (i, qty) in quantities.iter().enumerate() {
                let id = i64::try_from(i).unwrap();
                let price = Decimal::new(id * 100 + 250, 2);
                cart.add(Product::new(ProductId::new(id), "Dish", price));
                cart.update_quantity(ProductId::new(id), *qty);
                expected += price * Decimal::from(*qty);
            }
            prop_assert_eq!(cart.total(), expected);
        }
    }
}
