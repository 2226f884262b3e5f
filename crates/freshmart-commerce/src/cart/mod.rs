//! Shopping cart module.
//!
//! Contains the cart model, its aggregates, the persistence seam and the
//! session-wide [`CartStore`].

mod cart;
mod pricing;
mod repository;
mod store;

pub use cart::{Cart, CartLine, LineChange};
pub use pricing::CartSummary;
pub use repository::{CartRepository, MemoryCartRepository, SessionCartRepository};
pub use store::{CartEvent, CartEventKind, CartStore, SubscriptionId};
