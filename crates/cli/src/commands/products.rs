//! Product commands. Create, update and delete require an admin session.

use mlk_shop_core::ProductId;
use mlk_shop_storefront::AppState;
use mlk_shop_storefront::models::{Product, ProductDraft};
use mlk_shop_storefront::routes::Route;
use mlk_shop_storefront::services::ConfirmModalRequest;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CliError, enter, fetch_product, product_line};

pub async fn list(state: &AppState, category: Option<&str>) -> Result<(), CliError> {
    let products = state.api().list_products().await?;
    let shown: Vec<&Product> = products
        .iter()
        .filter(|p| category.is_none_or(|c| p.in_category(c)))
        .collect();
    if shown.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for product in shown {
        println!("{}", product_line(product));
    }
    Ok(())
}

pub async fn show(state: &AppState, id: &str) -> Result<(), CliError> {
    let product = fetch_product(state, id).await?;
    state
        .navigator()
        .navigate(Route::ProductDetail(ProductId::from(id)));

    println!("{}", product.name);
    println!("  sku:      {}", product.sku_code);
    println!("  price:    {}", product.price);
    println!("  category: {}", product.category_or_default());
    if let Some(stock) = product.in_stock {
        println!("  stock:    {stock}");
    }
    if let (Some(rating), Some(reviews)) = (product.rating, product.reviews) {
        println!("  rating:   {rating:.1} ({reviews} reviews)");
    }
    println!("  image:    {}", state.image_url(product.cover_image()));
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

pub async fn create(state: &AppState, draft: ProductDraft) -> Result<(), CliError> {
    enter(state, Route::AddProduct)?;
    let product = draft.into_product()?;
    let created = state.api().create_product(product).await?;
    let id = created.id.as_ref().map_or("-", ProductId::as_str);
    state
        .notifications()
        .success(format!("Created {} ({id})", created.name));
    Ok(())
}

/// Load the product into a draft, let `edit` change it, and save it back.
pub async fn update<F>(state: &AppState, id: &str, edit: F) -> Result<(), CliError>
where
    F: FnOnce(&mut ProductDraft),
{
    let id = ProductId::from(id);
    enter(state, Route::EditProduct(id.clone()))?;

    let existing = state.api().get_product(&id).await?;
    let mut draft = ProductDraft::from_product(&existing);
    edit(&mut draft);

    let product = Product {
        id: Some(id.clone()),
        rating: existing.rating,
        reviews: existing.reviews,
        ..draft.into_product()?
    };
    let updated = state.api().update_product(&id, product).await?;
    state
        .notifications()
        .success(format!("Updated {}", updated.name));
    Ok(())
}

/// Delete a product after confirmation.
pub async fn delete(state: &AppState, id: &str, assume_yes: bool) -> Result<(), CliError> {
    enter(state, Route::AdminDashboard)?;
    let id = ProductId::from(id);

    let answer = state.modal().open_confirm(
        ConfirmModalRequest::new(
            "Delete product",
            format!("Delete product {id}? This cannot be undone."),
        )
        .confirm_label("Delete")
        .danger(),
    );
    if assume_yes || prompt(state).await? {
        state.modal().confirm();
    } else {
        state.modal().cancel();
    }
    if !answer.await {
        state.notifications().info("Delete cancelled");
        return Ok(());
    }

    state.api().delete_product(&id).await?;
    state.favorites().remove(&id);
    state.cart().remove_from_cart(&id);
    state.notifications().success(format!("Deleted {id}"));
    Ok(())
}

/// Show the displayed confirmation and read a y/N answer from stdin.
async fn prompt(state: &AppState) -> Result<bool, CliError> {
    let Some(request) = state.modal().current() else {
        return Ok(false);
    };
    println!("{}", request.title);
    println!("{}", request.message);
    println!("[{}: y / {}: N]", request.confirm_label, request.cancel_label);

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}
