//! Monetary amounts.
//!
//! Amounts are exact decimals in the domain and minor units (cents) in storage.
//! Every currency the storefront sells in has two decimal places.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Decimal places kept for every amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("currency mismatch: {0} vs {1}")]
    CurrencyMismatch(String, String),
    #[error("amount out of range")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.round_dp(MINOR_UNIT_SCALE),
            currency: currency.into(),
        }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn from_minor_units(minor: i64, currency: impl Into<String>) -> Self {
        Self::new(Decimal::new(minor, MINOR_UNIT_SCALE), currency)
    }

    pub fn to_minor_units(&self) -> Result<i64, MoneyError> {
        (self.amount.round_dp(MINOR_UNIT_SCALE) * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .ok_or(MoneyError::Overflow)
    }

    /// Lossy conversion for the GraphQL `Float` scalar.
    pub fn amount_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or_default()
    }

    pub fn times(&self, quantity: u32) -> Result<Self, MoneyError> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    pub fn checked_add(&self, other: &Money) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
