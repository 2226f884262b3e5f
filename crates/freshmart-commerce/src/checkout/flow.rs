//! Placing an order from the active cart.

use chrono::Utc;

use crate::cart::{CartRepository, CartStore};
use crate::checkout::{
    CustomerInfo, OrderDraft, PaymentGateway, PaymentOutcome, Receipt, SimulatedGateway,
};
use crate::config::CheckoutConfig;
use crate::error::CommerceError;

/// Turns a cart into a paid order.
///
/// The cart is cleared only after the gateway approves; any earlier failure
/// leaves it untouched so the customer can retry.
#[derive(Debug, Clone)]
pub struct Checkout<G: PaymentGateway> {
    gateway: G,
}

impl Checkout<SimulatedGateway> {
    /// Checkout backed by the simulated gateway.
    pub fn simulated(config: &CheckoutConfig) -> Self {
        Self::new(SimulatedGateway::from_config(config))
    }
}

impl<G: PaymentGateway> Checkout<G> {
    /// Checkout using `gateway` for payment.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// The payment gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate, charge and, on approval, empty the cart.
    pub async fn place_order<R: CartRepository>(
        &self,
        store: &mut CartStore<R>,
        customer: CustomerInfo,
    ) -> Result<Receipt, CommerceError> {
        if store.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer.validate()?;

        let draft = OrderDraft::from_cart(store.cart(), customer, Utc::now())?;
        tracing::debug!(
            order = %draft.order_number,
            total = %draft.total_amount,
            "charging order"
        );

        let reference = match self.gateway.charge(&draft).await? {
            PaymentOutcome::Approved { reference } => reference,
            PaymentOutcome::Declined { reason } => {
                tracing::warn!(order = %draft.order_number, %reason, "payment declined");
                return Err(CommerceError::PaymentDeclined(reason));
            }
        };

        if let Err(e) = store.clear_cart() {
            tracing::warn!(
                order = %draft.order_number,
                error = %e,
                "order paid but emptied cart was not persisted"
            );
        }

        tracing::info!(
            order = %draft.order_number,
            items = draft.item_count(),
            total = %draft.total_amount,
            "order placed"
        );

        Ok(Receipt {
            order: draft,
            payment_reference: reference,
            paid_at: Utc::now(),
        })
    }
}
