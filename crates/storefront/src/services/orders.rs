//! Order placement for single products and for the whole cart.

use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{AppError, ValidationError};
use crate::models::{OrderRequest, Product};
use crate::stores::{CartStore, SessionStore};

/// Places orders on behalf of the logged-in user.
#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
    session: SessionStore,
    cart: CartStore,
}

impl OrderService {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore, cart: CartStore) -> Self {
        Self { api, session, cart }
    }

    /// Order `quantity` units of `product`.
    ///
    /// Returns the server's confirmation text.
    ///
    /// # Errors
    ///
    /// Returns a validation error when nobody is logged in or the quantity is
    /// zero, and an API error if the server rejects the order.
    #[instrument(skip(self, product), fields(sku = %product.sku_code))]
    pub async fn order_product(&self, product: &Product, quantity: u32) -> Result<String, AppError> {
        let user = self.session.user().ok_or(ValidationError::LoginRequired)?;
        let order = OrderRequest::for_user(product, quantity, &user)?;
        let confirmation = self.api.place_order(&order).await?;
        tracing::info!(quantity, "Order placed");
        Ok(confirmation)
    }

    /// Place one order per cart line.
    ///
    /// Orders cover the lines present when checkout starts. Each ordered
    /// quantity is taken off its line once the order succeeds, so units added
    /// while a request is in flight stay in the cart, and a failure part way
    /// through leaves exactly the unordered units behind.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Lines ordered before it stay ordered.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Vec<String>, AppError> {
        let user = self.session.user().ok_or(ValidationError::LoginRequired)?;
        let items = self.cart.items();
        let mut confirmations = Vec::with_capacity(items.len());

        for item in items {
            let order = OrderRequest::for_user(&item.product, item.quantity, &user)?;
            confirmations.push(self.api.place_order(&order).await?);
            if let Some(id) = &item.product.id {
                self.cart.deduct(id, item.quantity);
            }
        }

        tracing::info!(orders = confirmations.len(), "Checkout complete");
        Ok(confirmations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mlk_shop_core::Price;
    use url::Url;

    use super::*;
    use crate::middleware::AuthInterceptor;
    use crate::routes::Navigator;
    use crate::storage::MemoryStore;

    fn offline() -> (OrderService, CartStore) {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        let cart = CartStore::new(storage);
        let interceptor = AuthInterceptor::new(session.clone(), Navigator::new(session.clone()));
        let api = ApiClient::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Duration::from_secs(1),
            interceptor,
        )
        .unwrap();
        (OrderService::new(api, session, cart.clone()), cart)
    }

    #[tokio::test]
    async fn test_order_requires_login() {
        let (orders, _) = offline();
        let product = Product::new("SKU-1", "Mug", Price::from_cents(500).unwrap()).with_id("p1");
        let err = orders.order_product(&product, 1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::LoginRequired)
        ));
    }

    #[tokio::test]
    async fn test_checkout_requires_login_and_keeps_cart() {
        let (orders, cart) = offline();
        let product = Product::new("SKU-1", "Mug", Price::from_cents(500).unwrap()).with_id("p1");
        cart.add_to_cart(product, 2).unwrap();

        assert!(orders.checkout().await.is_err());
        assert_eq!(cart.count(), 2);
    }
}
