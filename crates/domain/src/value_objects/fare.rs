//! Fare value object
//!
//! Money amounts are stored in integer cents to avoid floating point
//! drift in display and comparison. Demo fares only - nothing is charged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// An estimated fare in US dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Fare {
    cents: u64,
}

impl Fare {
    /// Upper bound accepted from a generated offer
    const MAX_AMOUNT: f64 = 100_000.0;

    /// Create a fare from a dollar amount with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFare` if the amount is negative,
    /// non-finite, or implausibly large.
    pub fn from_amount(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 || amount > Self::MAX_AMOUNT {
            return Err(DomainError::InvalidFare(amount));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cents = (amount * 100.0).round() as u64;
        Ok(Self { cents })
    }

    /// Create a fare from integer cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Get the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.cents
    }

    /// Get the amount in dollars
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn amount(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}
