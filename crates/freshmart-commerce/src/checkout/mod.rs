//! Checkout module.
//!
//! Customer details, order snapshots, payment and the order flow.

mod flow;
mod order;
mod payment;

pub use flow::Checkout;
pub use order::{CustomerInfo, OrderDraft, OrderItem, Receipt};
pub use payment::{PaymentGateway, PaymentOutcome, SimulatedGateway};
