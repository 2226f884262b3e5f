//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Cart mutations themselves never fail; the only error they surface is
/// [`CommerceError::Persistence`], after the change has been applied in
/// memory.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Saving or loading the cart failed.
    #[error("Cart persistence failed: {0}")]
    Persistence(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Checkout attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payment was declined by the gateway.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl From<freshmart_cache::CacheError> for CommerceError {
    fn from(e: freshmart_cache::CacheError) -> Self {
        CommerceError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
