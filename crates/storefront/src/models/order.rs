//! Order placement types.

use mlk_shop_core::Price;
use serde::{Deserialize, Serialize};

use super::{Product, User};
use crate::error::ValidationError;

/// Domain used to synthesize an email for users who registered without one.
const FALLBACK_EMAIL_DOMAIN: &str = "mlk.shop";

/// Contact details attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserDetails {
    /// Derive order contact details from the logged-in user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let email = user
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("{}@{FALLBACK_EMAIL_DOMAIN}", user.username));
        Self {
            email,
            first_name: user.username.clone(),
            last_name: String::new(),
        }
    }
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub sku_code: String,
    pub price: Price,
    pub quantity: u32,
    pub user_details: UserDetails,
}

impl OrderRequest {
    /// Build an order for `quantity` units of `product` on behalf of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroQuantity`] if `quantity` is zero.
    pub fn for_user(product: &Product, quantity: u32, user: &User) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok(Self {
            sku_code: product.sku_code.clone(),
            price: product.price,
            quantity,
            user_details: UserDetails::from_user(user),
        })
    }
}
