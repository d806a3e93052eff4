//! Product catalog types.

use mlk_shop_core::{Price, ProductId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Category shown for products that have none.
pub const DEFAULT_CATEGORY: &str = "Fashion";

/// Colors a new product form starts with.
pub const DEFAULT_COLORS: [&str; 4] = ["#7C3AED", "#EF4444", "#3B82F6", "#10B981"];

/// Sizes a new product form starts with.
pub const DEFAULT_SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// A catalog product as returned by `GET /product`.
///
/// The id is absent until the server has persisted the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub sku_code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    /// Units in stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<u32>,
    /// All product images, URIs or data-URIs, in display order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Legacy single image field still sent by older catalog entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_empty")]
    pub sizes: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Create a product with the required fields only.
    #[must_use]
    pub fn new(sku_code: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: None,
            sku_code: sku_code.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: None,
            rating: None,
            reviews: None,
            in_stock: None,
            images: Vec::new(),
            cover_image: None,
            image: None,
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    /// Builder-style id setter.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The image to show on product cards.
    ///
    /// An explicit cover wins; otherwise the first image; otherwise the
    /// legacy `image` field.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.images.first().map(String::as_str))
            .or(self.image.as_deref())
    }

    /// Write the implicit cover (first image) into `cover_image` when none is set.
    pub fn normalize_cover(&mut self) {
        let missing = self.cover_image.as_deref().is_none_or(str::is_empty);
        if missing {
            self.cover_image = self.images.first().cloned();
        }
    }

    /// Whether any units are in stock. Unknown stock counts as available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.in_stock.is_none_or(|n| n > 0)
    }

    /// The category, with uncategorized products listed under
    /// [`DEFAULT_CATEGORY`].
    #[must_use]
    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Case-insensitive category match. `"all"` matches every product.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        category.eq_ignore_ascii_case("all")
            || self.category_or_default().eq_ignore_ascii_case(category)
    }
}

/// Admin form input for creating or editing a product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub sku_code: String,
    pub price: Price,
    pub category: Option<String>,
    pub in_stock: u32,
    pub images: Vec<String>,
    /// Index into `images` of the chosen cover. `None` picks the first image.
    pub cover_index: Option<usize>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl ProductDraft {
    /// Start a draft from an existing product (edit form).
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let cover_index = product
            .cover_image
            .as_ref()
            .and_then(|cover| product.images.iter().position(|img| img == cover));
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            sku_code: product.sku_code.clone(),
            price: product.price,
            category: product.category.clone(),
            in_stock: product.in_stock.unwrap_or(0),
            images: product.images.clone(),
            cover_index,
            colors: product.colors.clone(),
            sizes: product.sizes.clone(),
        }
    }

    /// Fill in [`DEFAULT_COLORS`] and [`DEFAULT_SIZES`], as a new product
    /// form does.
    #[must_use]
    pub fn with_default_options(mut self) -> Self {
        for color in DEFAULT_COLORS {
            self.add_color(color);
        }
        for size in DEFAULT_SIZES {
            self.add_size(size);
        }
        self
    }

    /// Add a color. Blank and already listed colors are skipped.
    ///
    /// Returns whether the color was added.
    pub fn add_color(&mut self, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() || self.colors.iter().any(|c| c == color) {
            return false;
        }
        self.colors.push(color.to_owned());
        true
    }

    /// Add a size, stored uppercase. Blank and already listed sizes are skipped.
    ///
    /// Returns whether the size was added.
    pub fn add_size(&mut self, size: &str) -> bool {
        let size = size.trim().to_uppercase();
        if size.is_empty() || self.sizes.contains(&size) {
            return false;
        }
        self.sizes.push(size);
        true
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.sku_code.trim().is_empty() {
            return Err(ValidationError::Required("sku code"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::Required("description"));
        }
        if let Some(index) = self.cover_index
            && index >= self.images.len()
        {
            return Err(ValidationError::CoverOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        Ok(())
    }

    /// Validate and convert into a [`Product`] ready to send to the API.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is incomplete.
    pub fn into_product(self) -> Result<Product, ValidationError> {
        self.validate()?;

        let cover_image = match self.cover_index {
            Some(index) => self.images.get(index).cloned(),
            None => self.images.first().cloned(),
        };

        Ok(Product {
            category: self.category.filter(|c| !c.trim().is_empty()),
            in_stock: Some(self.in_stock),
            description: self.description.trim().to_owned(),
            images: self.images,
            cover_image,
            colors: self.colors,
            sizes: self.sizes,
            ..Product::new(self.sku_code.trim(), self.name.trim(), self.price)
        })
    }
}
