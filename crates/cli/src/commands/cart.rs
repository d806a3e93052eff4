//! Cart commands.

use mlk_shop_core::ProductId;
use mlk_shop_storefront::AppState;
use mlk_shop_storefront::routes::Route;

use super::{CliError, fetch_product};

pub async fn add(state: &AppState, product_id: &str, quantity: u32) -> Result<(), CliError> {
    let product = fetch_product(state, product_id).await?;
    if !product.is_available() {
        state
            .notifications()
            .warning(format!("{} is out of stock", product.name));
    }
    let name = product.name.clone();
    state.cart().add_to_cart(product, quantity)?;
    state
        .notifications()
        .success(format!("Added {quantity} x {name} to cart"));
    Ok(())
}

pub fn set(state: &AppState, product_id: &str, quantity: u32) {
    let id = ProductId::from(product_id);
    if state.cart().quantity_of(&id).is_none() {
        state
            .notifications()
            .warning(format!("{product_id} is not in the cart"));
        return;
    }
    state.cart().update_quantity(&id, quantity);
}

pub fn remove(state: &AppState, product_id: &str) {
    state.cart().remove_from_cart(&ProductId::from(product_id));
    state.notifications().info("Removed from cart");
}

pub fn show(state: &AppState) {
    state.navigator().navigate(Route::Cart);
    let cart = state.cart().cart();
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        let id = item.product.id.as_ref().map_or("-", ProductId::as_str);
        println!(
            "{id:<12} {:<32} {:>4} x {:>10} = {:>10}",
            item.product.name,
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string()
        );
    }
    println!("{} items, total {}", cart.count(), cart.total());
}

pub fn clear(state: &AppState) {
    state.cart().clear();
    state.notifications().info("Cart cleared");
}
