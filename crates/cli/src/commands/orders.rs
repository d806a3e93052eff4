//! Order commands.

use mlk_shop_storefront::AppState;

use super::{CliError, fetch_product};

/// Order one product directly, bypassing the cart.
pub async fn order(state: &AppState, product_id: &str, quantity: u32) -> Result<(), CliError> {
    let product = fetch_product(state, product_id).await?;
    let confirmation = state.orders().order_product(&product, quantity).await?;
    state.notifications().success(confirmation);
    Ok(())
}

/// Order every cart line.
pub async fn checkout(state: &AppState) -> Result<(), CliError> {
    if state.cart().count() == 0 {
        state.notifications().info("Your cart is empty");
        return Ok(());
    }
    let total = state.cart().total();
    let confirmations = state.orders().checkout().await?;
    for confirmation in confirmations {
        println!("{confirmation}");
    }
    state
        .notifications()
        .success(format!("Checkout complete, total {total}"));
    Ok(())
}
