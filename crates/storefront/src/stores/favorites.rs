//! Favorite products store.

use std::collections::HashSet;
use std::sync::Arc;

use mlk_shop_core::ProductId;

use super::PersistentStore;
use crate::models::Product;
use crate::observable::Subscription;
use crate::storage::{KeyValueStore, keys};

/// Favorite product snapshots keyed by id, persisted under `favorites`.
///
/// Products without an id are ignored by every operation.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    favorites: PersistentStore<Vec<Product>>,
}

impl FavoritesStore {
    /// Load favorites from storage, dropping id-less and duplicate entries.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            favorites: PersistentStore::load_with(keys::FAVORITES, storage, dedup_by_id),
        }
    }

    /// Add `product` unless it is already a favorite.
    pub fn add(&self, product: Product) {
        let Some(id) = product.id.as_ref() else {
            return;
        };
        if self.is_favorite(id) {
            return;
        }
        self.favorites.update(|favorites| favorites.push(product));
    }

    /// Remove the favorite with `id`. Absent ids are a no-op.
    pub fn remove(&self, id: &ProductId) {
        if !self.is_favorite(id) {
            return;
        }
        self.favorites
            .update(|favorites| favorites.retain(|p| p.id.as_ref() != Some(id)));
    }

    /// Add `product` if absent, remove it if present.
    ///
    /// Returns whether the product is a favorite afterwards.
    pub fn toggle(&self, product: Product) -> bool {
        let Some(id) = product.id.clone() else {
            return false;
        };
        if self.is_favorite(&id) {
            self.remove(&id);
            false
        } else {
            self.add(product);
            true
        }
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.favorites
            .get()
            .iter()
            .any(|p| p.id.as_ref() == Some(id))
    }

    /// Snapshot of all favorites in the order they were added.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.favorites.get()
    }

    /// Subscribe to favorites changes. The current list is delivered immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Vec<Product>) + Send + Sync + 'static,
    {
        self.favorites.subscribe(callback)
    }
}

fn dedup_by_id(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|p| p.id.as_ref().is_some_and(|id| seen.insert(id.clone())))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mlk_shop_core::Price;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: &str) -> Product {
        Product::new("SKU", id, Price::ZERO).with_id(id)
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = FavoritesStore::new(Arc::new(MemoryStore::new()));
        store.add(product("p1"));
        store.add(product("p1"));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let store = FavoritesStore::new(Arc::new(MemoryStore::new()));
        store.add(product("p1"));
        store.remove(&ProductId::new("p2"));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let store = FavoritesStore::new(Arc::new(MemoryStore::new()));
        let id = ProductId::new("p1");

        assert!(store.toggle(product("p1")));
        assert!(store.is_favorite(&id));
        assert!(!store.toggle(product("p1")));
        assert!(!store.is_favorite(&id));

        store.add(product("p2"));
        store.toggle(product("p2"));
        store.toggle(product("p2"));
        assert!(store.is_favorite(&ProductId::new("p2")));
    }

    #[test]
    fn test_products_without_id_ignored() {
        let store = FavoritesStore::new(Arc::new(MemoryStore::new()));
        let anonymous = Product::new("SKU", "Mug", Price::ZERO);
        store.add(anonymous.clone());
        assert!(!store.toggle(anonymous));
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_persisted_and_reloaded() {
        let storage = Arc::new(MemoryStore::new());
        FavoritesStore::new(storage.clone()).add(product("p1"));
        let reloaded = FavoritesStore::new(storage);
        assert!(reloaded.is_favorite(&ProductId::new("p1")));
    }

    #[test]
    fn test_stored_duplicates_dropped_on_load() {
        let stored = r#"[
            {"id": "p1", "skuCode": "A", "name": "A", "price": 1},
            {"id": "p1", "skuCode": "A", "name": "A", "price": 1},
            {"skuCode": "B", "name": "B", "price": 1}
        ]"#;
        let storage = Arc::new(MemoryStore::with_entries([(keys::FAVORITES, stored)]));
        let store = FavoritesStore::new(storage);
        assert_eq!(store.items().len(), 1);
    }
}
