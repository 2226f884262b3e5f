//! Runtime settings for the cart store and checkout.

use std::time::Duration;

use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Default session storage key for the persisted cart.
pub const DEFAULT_STORAGE_KEY: &str = "freshmart_cart";

/// Default simulated payment delay.
pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 1000;

/// Cart store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Session storage key the cart is saved under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Optional per-line quantity limit applied on top of stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_line_quantity: Option<i64>,

    /// Currency reported for an empty cart's total.
    #[serde(default)]
    pub currency: Currency,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_line_quantity: None,
            currency: Currency::default(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Checkout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// How long the simulated gateway waits before approving.
    #[serde(default = "default_payment_delay_ms")]
    pub payment_delay_ms: u64,
}

impl CheckoutConfig {
    /// Payment delay as a `Duration`.
    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_delay_ms: default_payment_delay_ms(),
        }
    }
}

fn default_payment_delay_ms() -> u64 {
    DEFAULT_PAYMENT_DELAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: CartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "freshmart_cart");

        let checkout: CheckoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(checkout.payment_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let config: CartConfig =
            serde_json::from_str(r#"{"storage_key":"cart_v2","max_line_quantity":20,"currency":"USD"}"#)
                .unwrap();
        assert_eq!(config.storage_key, "cart_v2");
        assert_eq!(config.max_line_quantity, Some(20));
        assert_eq!(config.currency, Currency::USD);
    }
}
