//! Product records as served by the catalog.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// The cart keeps a copy of this record per line and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Unit price.
    pub price: Money,
    /// Units available for sale.
    pub stock: i64,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Brand name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    /// Create a product without display metadata.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            price,
            stock,
            image: None,
            brand: None,
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Check if at least one unit can be bought.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Largest quantity of this product a cart line may hold.
    ///
    /// `cap` is an optional store-wide per-line limit applied on top of stock.
    pub fn max_line_quantity(&self, cap: Option<i64>) -> i64 {
        let stock = self.stock.max(0);
        cap.map_or(stock, |cap| stock.min(cap.max(0)))
    }
}
