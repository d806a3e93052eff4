//! Favorites commands.

use mlk_shop_storefront::AppState;

use super::{CliError, fetch_product, product_line};

pub async fn toggle(state: &AppState, product_id: &str) -> Result<(), CliError> {
    let product = fetch_product(state, product_id).await?;
    let name = product.name.clone();
    if state.favorites().toggle(product) {
        state.notifications().success(format!("Added {name} to favorites"));
    } else {
        state.notifications().info(format!("Removed {name} from favorites"));
    }
    Ok(())
}

pub fn list(state: &AppState) {
    let favorites = state.favorites().items();
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for product in &favorites {
        println!("{}", product_line(product));
    }
}
