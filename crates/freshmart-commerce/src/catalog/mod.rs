//! Product catalog module.
//!
//! Contains the product record and the read-only catalog the cart consumes.

mod product;
mod source;

pub use product::Product;
pub use source::{InMemoryCatalog, ProductCatalog};
