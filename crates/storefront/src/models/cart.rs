//! Cart lines and the pure operations over them.
//!
//! The [`CartStore`](crate::stores::CartStore) clones the current [`Cart`],
//! applies one of these operations and publishes the result.

use mlk_shop_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::error::ValidationError;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    fn id(&self) -> Option<&ProductId> {
        self.product.id.as_ref()
    }
}

/// The shopping cart: at most one line per product id, every quantity >= 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// Adding zero units leaves the cart unchanged. The stored snapshot of an
    /// existing line is kept; only its quantity grows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProductId`] if the product has no id.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), ValidationError> {
        let id = product.id.clone().ok_or(ValidationError::MissingProductId)?;
        if quantity == 0 {
            return Ok(());
        }

        match self.items.iter_mut().find(|item| item.id() == Some(&id)) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }
        Ok(())
    }

    /// Set the quantity of the line for `id`. Zero removes the line.
    ///
    /// Returns `false` if no line exists for `id`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.items.iter_mut().find(|item| item.id() == Some(id)) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != Some(id));
        self.items.len() != before
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Restore the cart invariants on data read back from storage.
    ///
    /// Lines without an id or with a zero quantity are dropped, and
    /// duplicate lines for the same id are merged into the first one.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut cart = Self::default();
        for item in self.items {
            // add() drops id-less lines and zero quantities
            let _ = cart.add(item.product, item.quantity);
        }
        cart
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
        .normalized()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product::new(format!("SKU-{id}"), id, Price::from_cents(cents).unwrap()).with_id(id)
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::default();
        cart.add(product("p1", 1000), 2).unwrap();
        cart.add(product("p1", 1000), 3).unwrap();
        cart.add(product("p2", 250), 1).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 5);
        assert_eq!(cart.count(), 6);
        assert_eq!(cart.total(), Price::from_cents(5250).unwrap());
    }

    #[test]
    fn test_add_without_id_rejected() {
        let mut cart = Cart::default();
        let anonymous = Product::new("SKU", "Mug", Price::ZERO);
        assert_eq!(
            cart.add(anonymous, 1),
            Err(ValidationError::MissingProductId)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        cart.add(product("p1", 100), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(product("p1", 100), 2).unwrap();
        let id = ProductId::new("p1");

        assert!(cart.set_quantity(&id, 7));
        assert_eq!(cart.get(&id).unwrap().quantity, 7);

        assert!(cart.set_quantity(&id, 0));
        assert!(cart.get(&id).is_none());
        assert!(!cart.set_quantity(&id, 3));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::default();
        cart.add(product("p1", 100), 1).unwrap();
        assert!(!cart.remove(&ProductId::new("missing")));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_normalized_merges_and_drops() {
        let stored = r#"[
            {"product": {"id": "p1", "skuCode": "A", "name": "A", "price": 2}, "quantity": 1},
            {"product": {"id": "p1", "skuCode": "A", "name": "A", "price": 2}, "quantity": 4},
            {"product": {"id": "p2", "skuCode": "B", "name": "B", "price": 3}, "quantity": 0},
            {"product": {"skuCode": "C", "name": "C", "price": 3}, "quantity": 2}
        ]"#;
        let cart: Cart = serde_json::from_str::<Cart>(stored).unwrap().normalized();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), Price::from_cents(1000).unwrap());
    }

    #[test]
    fn test_total_recomputed_after_each_change() {
        let mut cart = Cart::default();
        cart.add(product("p1", 1000), 1).unwrap();
        assert_eq!(cart.total(), Price::from_cents(1000).unwrap());
        cart.set_quantity(&ProductId::new("p1"), 4);
        assert_eq!(cart.total(), Price::from_cents(4000).unwrap());
        cart.remove(&ProductId::new("p1"));
        assert_eq!(cart.total(), Price::ZERO);
    }
}
