//! Command implementations.
//!
//! Each command drives the storefront library the way a view would, then
//! prints a result. Status messages go through the notification center and
//! are printed once the command finishes.

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod orders;
pub mod products;

use mlk_shop_core::{NotificationKind, ProductId};
use mlk_shop_storefront::api::ApiError;
use mlk_shop_storefront::config::ConfigError;
use mlk_shop_storefront::models::Product;
use mlk_shop_storefront::routes::Route;
use mlk_shop_storefront::services::AuthError;
use mlk_shop_storefront::{AppError, AppState, ValidationError};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Reading the confirmation answer failed.
    #[error("Failed to read answer: {0}")]
    Prompt(#[from] std::io::Error),
}

impl CliError {
    /// Text printed to the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            Self::Prompt(err) => err.to_string(),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::App(err.into())
    }
}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        Self::App(err.into())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::App(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::App(err.into())
    }
}

/// Enter `route`, failing when the route guard redirects elsewhere.
pub fn enter(state: &AppState, route: Route) -> Result<(), CliError> {
    let entered = state.navigator().navigate(route.clone());
    if entered != route {
        return Err(AppError::Forbidden(route.path()).into());
    }
    Ok(())
}

/// Fetch a product from the catalog.
pub async fn fetch_product(state: &AppState, id: &str) -> Result<Product, CliError> {
    Ok(state.api().get_product(&ProductId::from(id)).await?)
}

/// Print and dismiss every pending notification.
pub fn flush_notifications(state: &AppState) {
    for notification in state.notifications().notifications() {
        match notification.kind {
            NotificationKind::Error | NotificationKind::Warning => {
                eprintln!("{}: {}", notification.kind, notification.message);
            }
            NotificationKind::Success | NotificationKind::Info => {
                println!("{}", notification.message);
            }
        }
        state.notifications().dismiss(&notification.id);
    }
}

/// One-line summary of a product for listings.
pub fn product_line(product: &Product) -> String {
    let id = product.id.as_ref().map_or("-", ProductId::as_str);
    let stock = match product.in_stock {
        Some(0) => " (out of stock)".to_string(),
        Some(n) => format!(" ({n} in stock)"),
        None => String::new(),
    };
    format!(
        "{id:<12} {:<32} {:>10}  [{}]{stock}",
        product.name,
        product.price.to_string(),
        product.category_or_default()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mlk_shop_core::Price;

    use super::*;

    #[test]
    fn test_product_line() {
        let mut product = Product::new("SKU", "Mug", Price::from_cents(1050).unwrap()).with_id("p1");
        product.in_stock = Some(0);
        let line = product_line(&product);
        assert!(line.starts_with("p1"));
        assert!(line.contains("$10.50"));
        assert!(line.contains("[Fashion]"));
        assert!(line.ends_with("(out of stock)"));
    }

    #[test]
    fn test_user_message_from_validation() {
        let err = CliError::from(ValidationError::ZeroQuantity);
        assert_eq!(err.user_message(), "quantity must be at least 1");
    }
}
