//! Shopping cart state.
//!
//! [`CartStore`] owns a shopper's line items for the lifetime of their
//! session. Every mutation writes the full item list back to the key-value
//! store before returning, and a new store restores from the same key, so a
//! reload reconstructs the same cart.
//!
//! # Invariants
//!
//! - At most one line per product ID; adding an existing ID bumps its quantity.
//! - Quantities are always at least 1. Dropping to zero removes the line.
//! - Totals are derived on every read and never cached.

use dewdrop_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::Product;
use crate::storage::{self, SharedStore, StorageError, keys};

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 5000;

/// Shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE_CENTS: i64 = 500;

/// Category recorded for products added from quiz recommendations.
pub const QUIZ_PRODUCT_CATEGORY: &str = "Skincare";

// =============================================================================
// Line Items
// =============================================================================

/// A product the shopper wants to add.
///
/// Quantity is not part of the candidate: adding always means "one more".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub discounted_price: Option<Price>,
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            category: QUIZ_PRODUCT_CATEGORY.to_string(),
            price: product.price,
            discounted_price: product.discounted_price,
        }
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub category: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Price>,
    pub quantity: u32,
}

impl CartItem {
    fn from_candidate(candidate: NewCartItem) -> Self {
        // Only a positive price at or below list price counts as a discount.
        let discounted_price = candidate
            .discounted_price
            .filter(|discounted| Price::ZERO < *discounted && *discounted <= candidate.price);

        Self {
            id: candidate.id,
            name: candidate.name,
            image: candidate.image,
            category: candidate.category,
            price: candidate.price,
            discounted_price,
            quantity: 1,
        }
    }

    /// The per-unit price charged: the discounted price when present.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.discounted_price.unwrap_or(self.price)
    }

    /// What this line contributes to the subtotal.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price() * self.quantity
    }

    /// This line at list price, for showing a struck-through original.
    #[must_use]
    pub fn line_list_total(&self) -> Price {
        self.price * self.quantity
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Flat-fee shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal at which shipping becomes free (inclusive).
    pub free_threshold: Price,
    /// Fee charged below the threshold.
    pub flat_fee: Price,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Price::from_cents(FREE_SHIPPING_THRESHOLD_CENTS),
            flat_fee: Price::from_cents(FLAT_SHIPPING_FEE_CENTS),
        }
    }
}

impl ShippingPolicy {
    /// Shipping charged for `subtotal`.
    #[must_use]
    pub fn fee_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }

    /// How much more the shopper must spend to ship free.
    #[must_use]
    pub fn remaining_for_free(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.free_threshold - subtotal
        }
    }
}

/// Derived cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub amount_until_free_shipping: Price,
}

// =============================================================================
// Store
// =============================================================================

/// A shopper's cart, persisted under the `cart` key.
pub struct CartStore {
    items: Vec<CartItem>,
    is_open: bool,
    shipping: ShippingPolicy,
    store: SharedStore,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("is_open", &self.is_open)
            .field("shipping", &self.shipping)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart from `store` with the default shipping policy.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        Self::load_with_policy(store, ShippingPolicy::default())
    }

    /// Restore the cart from `store`.
    ///
    /// Stored lines with zero quantity are dropped and duplicate IDs are
    /// merged, so the invariants hold even for hand-edited storage.
    #[must_use]
    pub fn load_with_policy(store: SharedStore, shipping: ShippingPolicy) -> Self {
        let stored: Vec<CartItem> = storage::load_or_default(&*store, keys::CART);

        let mut items: Vec<CartItem> = Vec::with_capacity(stored.len());
        for item in stored.into_iter().filter(|item| item.quantity > 0) {
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => items.push(item),
            }
        }

        tracing::debug!(lines = items.len(), "Cart restored");

        Self {
            items,
            is_open: false,
            shipping,
            store,
        }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart only its quantity changes;
    /// differing fields on `candidate` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted. The in-memory
    /// cart is updated regardless.
    #[instrument(skip(self, candidate), fields(product_id = %candidate.id))]
    pub fn add_item(&mut self, candidate: NewCartItem) -> Result<(), StorageError> {
        match self.items.iter_mut().find(|item| item.id == candidate.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(1);
                tracing::debug!(quantity = existing.quantity, "Incremented cart line");
            }
            None => {
                self.items.push(CartItem::from_candidate(candidate));
                tracing::debug!("Added cart line");
            }
        }
        self.persist()
    }

    /// Remove a line. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<(), StorageError> {
        self.items.retain(|item| &item.id != id);
        self.persist()
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), StorageError> {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist()
    }

    /// Sum of line totals, at discounted prices where present.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Shipping charged on the current subtotal.
    #[must_use]
    pub fn shipping_fee(&self) -> Price {
        self.shipping.fee_for(self.subtotal())
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        let subtotal = self.subtotal();
        subtotal + self.shipping.fee_for(subtotal)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    /// All derived figures, computed from one subtotal read.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let shipping = self.shipping.fee_for(subtotal);
        CartTotals {
            item_count: self.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
            amount_until_free_shipping: self.shipping.remaining_for_free(subtotal),
        }
    }

    /// Whether the cart panel is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show or hide the cart panel.
    pub const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    fn persist(&self) -> Result<(), StorageError> {
        storage::save(&*self.store, keys::CART, &self.items).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist cart");
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::testing::FailingStore;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn candidate(id: &str, cents: i64, discounted_cents: Option<i64>) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            image: format!("/products/{id}.jpg"),
            category: "Skincare".to_string(),
            price: Price::from_cents(cents),
            discounted_price: discounted_cents.map(Price::from_cents),
        }
    }

    fn stored_lines(store: &dyn KeyValueStore) -> Vec<CartItem> {
        storage::load_or_default(store, keys::CART)
    }

    fn empty_cart() -> (Arc<MemoryStore>, CartStore) {
        let backend = Arc::new(MemoryStore::new());
        let cart = CartStore::load(backend.clone());
        (backend, cart)
    }

    #[test]
    fn test_add_same_id_increments_quantity() {
        let (_, mut cart) = empty_cart();
        for _ in 0..4 {
            cart.add_item(candidate("1", 2499, None)).unwrap();
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 4);
    }

    #[test]
    fn test_add_existing_ignores_candidate_fields() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();

        let mut changed = candidate("1", 9999, Some(100));
        changed.name = "Renamed".to_string();
        cart.add_item(changed).unwrap();

        let line = cart.get(&ProductId::new("1")).unwrap();
        assert_eq!(line.name, "Product 1");
        assert_eq!(line.price, Price::from_cents(2499));
        assert_eq!(line.discounted_price, None);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_remove_item() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();
        cart.add_item(candidate("2", 3999, None)).unwrap();

        cart.remove_item(&ProductId::new("1")).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert!(cart.get(&ProductId::new("1")).is_none());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();

        cart.remove_item(&ProductId::new("missing")).unwrap();

        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();

        cart.update_quantity(&ProductId::new("1"), 7).unwrap();

        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();
        cart.add_item(candidate("2", 3999, None)).unwrap();

        cart.update_quantity(&ProductId::new("1"), 0).unwrap();
        cart.update_quantity(&ProductId::new("2"), -3).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_is_noop() {
        let (_, mut cart) = empty_cart();
        cart.update_quantity(&ProductId::new("ghost"), 3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_uses_discounted_price() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 4999, Some(3999))).unwrap();
        cart.add_item(candidate("1", 4999, Some(3999))).unwrap();
        cart.add_item(candidate("2", 1000, None)).unwrap();

        // 2 x 39.99 + 10.00
        assert_eq!(cart.subtotal(), Price::from_cents(8998));
    }

    #[test]
    fn test_subtotal_tracks_every_mutation() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();
        cart.add_item(candidate("2", 3999, Some(2999))).unwrap();
        cart.update_quantity(&ProductId::new("1"), 3).unwrap();
        cart.remove_item(&ProductId::new("2")).unwrap();
        cart.add_item(candidate("3", 500, None)).unwrap();

        let expected: Price = cart.items().iter().map(CartItem::line_total).sum();
        assert_eq!(cart.subtotal(), expected);
        assert_eq!(cart.subtotal(), Price::from_cents(3 * 2499 + 500));
    }

    #[test]
    fn test_discount_above_price_is_ignored() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 1000, Some(2000))).unwrap();

        assert_eq!(cart.subtotal(), Price::from_cents(1000));
    }

    #[test]
    fn test_failed_write_still_updates_cart() {
        let mut cart = CartStore::load(Arc::new(FailingStore));

        let result = cart.add_item(candidate("1", 2499, None));
        assert!(matches!(result, Err(StorageError::Poisoned)));
        assert_eq!(cart.item_count(), 1);

        assert!(cart.update_quantity(&ProductId::new("1"), 3).is_err());
        assert_eq!(cart.item_count(), 3);

        assert!(cart.remove_item(&ProductId::new("1")).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_non_positive_discount_is_ignored() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, Some(-10_000))).unwrap();
        cart.add_item(candidate("2", 1000, Some(0))).unwrap();

        assert_eq!(cart.get(&ProductId::new("1")).unwrap().discounted_price, None);
        assert_eq!(cart.subtotal(), Price::from_cents(3499));
        assert_eq!(cart.total(), Price::from_cents(3999));
    }

    #[test]
    fn test_total_adds_shipping_below_threshold() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 4999, None)).unwrap();

        assert_eq!(cart.shipping_fee(), Price::from_cents(500));
        assert_eq!(cart.total(), Price::from_cents(5499));
    }

    #[test]
    fn test_free_shipping_at_exact_threshold() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2500, None)).unwrap();
        cart.add_item(candidate("1", 2500, None)).unwrap();

        assert_eq!(cart.subtotal(), Price::from_cents(5000));
        assert_eq!(cart.total(), cart.subtotal());
        assert!(cart.shipping_fee().is_zero());
    }

    #[test]
    fn test_empty_cart_totals() {
        let (_, cart) = empty_cart();
        let totals = cart.totals();

        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.shipping, Price::from_cents(500));
        assert_eq!(totals.total, Price::from_cents(500));
        assert_eq!(totals.amount_until_free_shipping, Price::from_cents(5000));
    }

    #[test]
    fn test_totals_summary() {
        let (_, mut cart) = empty_cart();
        cart.add_item(candidate("1", 2499, None)).unwrap();
        cart.add_item(candidate("2", 1500, None)).unwrap();
        cart.add_item(candidate("2", 1500, None)).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, Price::from_cents(5499));
        assert!(totals.shipping.is_zero());
        assert_eq!(totals.total, Price::from_cents(5499));
        assert!(totals.amount_until_free_shipping.is_zero());
    }

    #[test]
    fn test_custom_shipping_policy() {
        let policy = ShippingPolicy {
            free_threshold: Price::from_cents(10_000),
            flat_fee: Price::from_cents(799),
        };
        let mut cart = CartStore::load_with_policy(Arc::new(MemoryStore::new()), policy);
        cart.add_item(candidate("1", 6000, None)).unwrap();

        assert_eq!(cart.total(), Price::from_cents(6799));
        assert_eq!(cart.totals().amount_until_free_shipping, Price::from_cents(4000));
    }

    #[test]
    fn test_every_mutation_persists() {
        let (backend, mut cart) = empty_cart();

        cart.add_item(candidate("1", 2499, None)).unwrap();
        assert_eq!(stored_lines(&*backend).len(), 1);

        cart.update_quantity(&ProductId::new("1"), 5).unwrap();
        assert_eq!(stored_lines(&*backend)[0].quantity, 5);

        cart.remove_item(&ProductId::new("1")).unwrap();
        assert!(stored_lines(&*backend).is_empty());
    }

    #[test]
    fn test_restore_reconstructs_cart() {
        let (backend, mut cart) = empty_cart();
        cart.add_item(candidate("1", 4999, Some(3999))).unwrap();
        cart.add_item(candidate("2", 1000, None)).unwrap();
        cart.update_quantity(&ProductId::new("2"), 3).unwrap();

        let restored = CartStore::load(backend);

        assert_eq!(restored.items(), cart.items());
        assert_eq!(restored.total(), cart.total());
    }

    #[test]
    fn test_restore_from_corrupted_storage_is_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::CART, "definitely not json").unwrap();

        let cart = CartStore::load(backend);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_repairs_invariants() {
        let backend = Arc::new(MemoryStore::new());
        let stored = r#"[
            {"id":"1","name":"A","image":"a.jpg","category":"Skincare","price":"10.00","quantity":2},
            {"id":"2","name":"B","image":"b.jpg","category":"Skincare","price":"5.00","quantity":0},
            {"id":"1","name":"A","image":"a.jpg","category":"Skincare","price":"10.00","quantity":1}
        ]"#;
        backend.set(keys::CART, stored).unwrap();

        let cart = CartStore::load(backend);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 3);
    }

    #[test]
    fn test_open_flag_has_no_side_effects() {
        let (backend, mut cart) = empty_cart();
        assert!(!cart.is_open());

        cart.set_open(true);

        assert!(cart.is_open());
        assert!(cart.is_empty());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_candidate_from_quiz_product() {
        let product = &crate::catalog::quiz_catalog()[1];
        let candidate = NewCartItem::from(product);

        assert_eq!(candidate.id, product.id);
        assert_eq!(candidate.category, QUIZ_PRODUCT_CATEGORY);
        assert_eq!(candidate.price, product.price);
    }
}
