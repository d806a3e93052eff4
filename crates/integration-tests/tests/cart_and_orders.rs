//! Cart, favorites and order placement against the stub API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mlk_shop_core::{Price, ProductId};
use mlk_shop_integration_tests::{StubApi, product};
use mlk_shop_storefront::error::{AppError, ValidationError};
use mlk_shop_storefront::AppState;
use mlk_shop_storefront::storage::{KeyValueStore, MemoryStore};

fn price(cents: i64) -> Price {
    Price::from_cents(cents).unwrap()
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_merges_lines_from_catalog() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();

    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    app.cart().add_to_cart(lamp.clone(), 2).unwrap();
    app.cart().add_to_cart(lamp, 3).unwrap();

    let items = app.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
    assert_eq!(app.cart().total(), price(5000));
    assert_eq!(app.cart().total().to_string(), "$50.00");
}

#[tokio::test]
async fn test_cart_and_favorites_survive_restart() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000), product("p2", "Mug", 450)]).await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    {
        let app = AppState::new(stub.config(), Arc::clone(&storage)).unwrap();
        let products = app.api().list_products().await.unwrap();
        for p in &products {
            app.cart().add_to_cart(p.clone(), 1).unwrap();
        }
        app.favorites().toggle(products[1].clone());
    }

    let app = AppState::new(stub.config(), storage).unwrap();
    assert_eq!(app.cart().count(), 2);
    assert_eq!(app.cart().total(), price(1450));
    assert!(app.favorites().is_favorite(&ProductId::new("p2")));
    assert!(!app.favorites().is_favorite(&ProductId::new("p1")));
}

#[tokio::test]
async fn test_update_quantity_zero_removes_line() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();
    let id = ProductId::new("p1");

    let lamp = app.api().get_product(&id).await.unwrap();
    app.cart().add_to_cart(lamp, 1).unwrap();
    app.cart().update_quantity(&id, 0);

    assert!(app.cart().items().is_empty());
    assert_eq!(app.cart().total(), Price::ZERO);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_uses_account_email() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();
    app.auth().login("bob", "secret").await.unwrap();

    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    let confirmation = app.orders().order_product(&lamp, 2).await.unwrap();
    assert_eq!(confirmation, "Order Placed Successfully");

    let orders = stub.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].sku_code, "SKU-p1");
    assert_eq!(orders[0].quantity, 2);
    assert_eq!(orders[0].price, price(1000));
    assert_eq!(orders[0].user_details.email, "bob@example.com");
    assert_eq!(orders[0].user_details.first_name, "bob");
    assert_eq!(orders[0].user_details.last_name, "");
}

#[tokio::test]
async fn test_order_email_falls_back_to_shop_domain() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();
    app.auth().login("admin", "admin").await.unwrap();

    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    app.orders().order_product(&lamp, 1).await.unwrap();

    assert_eq!(stub.orders()[0].user_details.email, "admin@mlk.shop");
}

#[tokio::test]
async fn test_order_rejects_zero_quantity_locally() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();
    app.auth().login("bob", "secret").await.unwrap();
    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    let requests = stub.request_count();

    let err = app.orders().order_product(&lamp, 0).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ZeroQuantity)
    ));
    assert_eq!(stub.request_count(), requests);
}

#[tokio::test]
async fn test_checkout_orders_every_line_then_clears() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000), product("p2", "Mug", 450)]).await;
    let (app, _) = stub.app();
    app.auth().login("bob", "secret").await.unwrap();

    for p in app.api().list_products().await.unwrap() {
        app.cart().add_to_cart(p, 2).unwrap();
    }
    let confirmations = app.orders().checkout().await.unwrap();

    assert_eq!(confirmations.len(), 2);
    let skus: Vec<_> = stub.orders().into_iter().map(|o| o.sku_code).collect();
    assert_eq!(skus, vec!["SKU-p1", "SKU-p2"]);
    assert!(app.cart().items().is_empty());
}

#[tokio::test]
async fn test_checkout_keeps_units_added_in_flight() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000), product("p2", "Mug", 450)]).await;
    let (app, _) = stub.app();
    app.auth().login("bob", "secret").await.unwrap();
    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    let mug = app.api().get_product(&"p2".into()).await.unwrap();
    app.cart().add_to_cart(lamp.clone(), 1).unwrap();

    let cart = app.cart().clone();
    let (checkout, ()) = tokio::join!(app.orders().checkout(), async move {
        tokio::task::yield_now().await;
        cart.add_to_cart(mug, 3).unwrap();
        cart.add_to_cart(lamp, 2).unwrap();
    });

    assert_eq!(checkout.unwrap().len(), 1);
    let orders = stub.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].sku_code, "SKU-p1");
    assert_eq!(orders[0].quantity, 1);

    assert_eq!(app.cart().quantity_of(&ProductId::new("p1")), Some(2));
    assert_eq!(app.cart().quantity_of(&ProductId::new("p2")), Some(3));
    assert_eq!(app.cart().count(), 5);
}

#[tokio::test]
async fn test_checkout_requires_login() {
    let stub = StubApi::start(vec![product("p1", "Lamp", 1000)]).await;
    let (app, _) = stub.app();
    let lamp = app.api().get_product(&"p1".into()).await.unwrap();
    app.cart().add_to_cart(lamp, 1).unwrap();

    let err = app.orders().checkout().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::LoginRequired)
    ));
    assert_eq!(app.cart().count(), 1);
    assert!(stub.orders().is_empty());
}
