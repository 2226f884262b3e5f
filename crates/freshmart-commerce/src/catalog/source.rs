//! Product lookup by id or slug.

use std::path::Path;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Read-only source of product records.
///
/// Carts consume products from here but never write back.
pub trait ProductCatalog {
    /// Look up a product by identifier.
    fn product_by_id(&self, id: &ProductId) -> Option<Product>;

    /// Look up a product by URL slug.
    fn product_by_slug(&self, slug: &str) -> Option<Product>;

    /// Every product, in catalog order.
    fn products(&self) -> Vec<Product>;
}

/// Catalog held in memory, typically loaded from a JSON array of products.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog from products. Later duplicates of an id replace
    /// earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Parse a JSON array of products.
    pub fn from_json_str(json: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| CommerceError::Catalog(format!("invalid catalog JSON: {}", e)))?;
        Ok(Self::from_products(products))
    }

    /// Load a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Insert or replace a product.
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products whose name or brand contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<Product> {
        let term = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p
                        .brand
                        .as_ref()
                        .is_some_and(|b| b.to_lowercase().contains(&term))
            })
            .cloned()
            .collect()
    }

    /// Products with stock left.
    pub fn in_stock(&self) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_in_stock())
            .cloned()
            .collect()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }

    fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.products.iter().find(|p| p.slug == slug).cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}
