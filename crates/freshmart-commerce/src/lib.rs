//! Shopping cart state and checkout for the FreshMart storefront.
//!
//! This crate provides the pieces every page of a session shares:
//!
//! - **Catalog**: Product records and a read-only catalog
//! - **Cart**: Cart lines, aggregates and the session-wide [`CartStore`]
//! - **Checkout**: Customer validation, order snapshots, simulated payment
//!
//! # Example
//!
//! ```rust
//! use freshmart_cache::{MemoryStore, SessionId};
//! use freshmart_commerce::prelude::*;
//!
//! let sessions = MemoryStore::new();
//! let repo = SessionCartRepository::new(sessions.session(SessionId::new("tab-1")));
//! let mut store = CartStore::restore(repo, CartConfig::default());
//!
//! let apples = Product::new("1", "Táo Fuji", "tao-fuji", Money::new(65_000, Currency::VND), 4);
//! store.add_to_cart(&apples, 10).unwrap();
//!
//! assert_eq!(store.total_items(), 4);
//! assert_eq!(store.total_price().display(), "260.000 ₫");
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::CartStore;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{CartConfig, CheckoutConfig};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{InMemoryCatalog, Product, ProductCatalog};

    // Cart
    pub use crate::cart::{
        Cart, CartEvent, CartEventKind, CartLine, CartRepository, CartStore, CartSummary,
        MemoryCartRepository, SessionCartRepository, SubscriptionId,
    };

    // Checkout
    pub use crate::checkout::{
        Checkout, CustomerInfo, OrderDraft, OrderItem, PaymentGateway, PaymentOutcome, Receipt,
        SimulatedGateway,
    };
}
