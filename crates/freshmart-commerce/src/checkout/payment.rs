//! Payment gateways.

use std::time::Duration;

use async_trait::async_trait;

use crate::checkout::OrderDraft;
use crate::config::CheckoutConfig;
use crate::error::CommerceError;

/// Gateway decision for a charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Charge accepted; carries the gateway's reference.
    Approved { reference: String },
    /// Charge refused.
    Declined { reason: String },
}

/// Something that can take payment for an order.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the order total.
    async fn charge(&self, order: &OrderDraft) -> Result<PaymentOutcome, CommerceError>;
}

/// Demo gateway: waits for a fixed delay, then approves every charge.
///
/// No money moves. The reference is derived from the order number.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Gateway that answers after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Gateway using the configured payment delay.
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(config.payment_delay())
    }

    /// Gateway that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, order: &OrderDraft) -> Result<PaymentOutcome, CommerceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(PaymentOutcome::Approved {
            reference: format!("SIM-{}", order.order_number),
        })
    }
}
