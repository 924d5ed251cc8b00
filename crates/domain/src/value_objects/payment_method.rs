//! Payment method value object
//!
//! Display-only in this demo; no real payment is processed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the passenger intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay the driver in cash
    Cash,
    /// Card on file
    #[default]
    Card,
    /// In-app wallet balance
    Wallet,
}

impl PaymentMethod {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Wallet => "Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" | "credit" | "credit_card" => Ok(Self::Card),
            "wallet" | "balance" => Ok(Self::Wallet),
            _ => Err("Invalid payment method"),
        }
    }
}
