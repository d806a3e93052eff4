//! Shopping cart store.

use std::sync::Arc;

use mlk_shop_core::{Price, ProductId};
use tracing::debug;

use super::PersistentStore;
use crate::error::ValidationError;
use crate::models::{Cart, CartItem, Product};
use crate::observable::Subscription;
use crate::storage::{KeyValueStore, keys};

/// The shopping cart, persisted under the `cart` key.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: PersistentStore<Cart>,
}

impl CartStore {
    /// Load the cart from storage, repairing any invariant violations.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: PersistentStore::load_with(keys::CART, storage, Cart::normalized),
        }
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProductId`] if the product has not
    /// been persisted yet.
    pub fn add_to_cart(&self, product: Product, quantity: u32) -> Result<(), ValidationError> {
        if product.id.is_none() {
            return Err(ValidationError::MissingProductId);
        }
        debug!(product_id = ?product.id, quantity, "Adding to cart");
        self.cart.update(|cart| cart.add(product, quantity))
    }

    /// Set the quantity of a line; zero removes it. Unknown ids are ignored.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        let mut cart = self.cart.get();
        if cart.set_quantity(id, quantity) {
            self.cart.replace(cart);
        }
    }

    /// Increase a line's quantity by one.
    pub fn increase(&self, id: &ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, quantity.saturating_add(1));
        }
    }

    /// Decrease a line's quantity by one, removing it when it reaches zero.
    pub fn decrease(&self, id: &ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, quantity.saturating_sub(1));
        }
    }

    /// Take `quantity` units off the line for `id`, removing it at zero.
    ///
    /// Units added after an order snapshot was taken stay in the cart.
    pub fn deduct(&self, id: &ProductId, quantity: u32) {
        let mut cart = self.cart.get();
        let Some(current) = cart.get(id).map(|item| item.quantity) else {
            return;
        };
        if cart.set_quantity(id, current.saturating_sub(quantity)) {
            self.cart.replace(cart);
        }
    }

    /// Remove the line for `id`. Absent ids are a no-op.
    pub fn remove_from_cart(&self, id: &ProductId) {
        let mut cart = self.cart.get();
        if cart.remove(id) {
            self.cart.replace(cart);
        }
    }

    /// Empty the cart and drop its storage key.
    pub fn clear(&self) {
        self.cart.reset();
    }

    /// Snapshot of the cart lines.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.cart.get().items().to_vec()
    }

    /// Snapshot of the whole cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.cart.get()
    }

    /// Current quantity for `id`, if the product is in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> Option<u32> {
        self.cart.get().get(id).map(|item| item.quantity)
    }

    /// Sum of price times quantity, computed from the current snapshot.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.get().total()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.get().count()
    }

    /// Subscribe to cart changes. The current cart is delivered immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Cart) + Send + Sync + 'static,
    {
        self.cart.subscribe(callback)
    }
}
