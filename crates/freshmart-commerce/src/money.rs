//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's smallest unit, so totals never
//! pick up floating-point error. VND has no minor unit: `Money::new(25000,
//! Currency::VND)` is twenty-five thousand đồng.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    VND,
    USD,
    EUR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "VND").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::VND => "VND",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::VND => "\u{20ab}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::VND | Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "VND" => Some(Currency::VND),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn separators(&self) -> (char, char) {
        match self {
            // vi-VN groups with '.' and uses ',' for decimals
            Currency::VND => ('.', ','),
            _ => (',', '.'),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    #[serde(default)]
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Format for display, e.g. `125.000 ₫` or `$49.99`.
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places();
        let (group_sep, decimal_sep) = self.currency.separators();
        let divisor = 10_u64.pow(places);
        let magnitude = self.amount.unsigned_abs();

        let mut text = group_digits(magnitude / divisor, group_sep);
        if places > 0 {
            text.push(decimal_sep);
            text.push_str(&format!(
                "{:0width$}",
                magnitude % divisor,
                width = places as usize
            ));
        }

        let sign = if self.amount < 0 { "-" } else { "" };
        match self.currency {
            Currency::VND => format!("{}{} {}", sign, text, self.currency.symbol()),
            _ => format!("{}{}{}", sign, self.currency.symbol(), text),
        }
    }

    /// Add another Money value.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Sum values that share `currency`, failing on mismatch or overflow.
    pub fn try_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Sum of `amount × quantity` terms, saturating at the `i64` bounds.
    pub fn saturating_total(
        terms: impl IntoIterator<Item = (Money, i64)>,
        currency: Currency,
    ) -> Money {
        let total: i128 = terms
            .into_iter()
            .map(|(price, quantity)| i128::from(price.amount) * i128::from(quantity))
            .sum();
        let amount = i64::try_from(total)
            .unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
        Money::new(amount, currency)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
