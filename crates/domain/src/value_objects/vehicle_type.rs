//! Vehicle type value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle category requested by a passenger or offered by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Compact, lowest fare
    #[default]
    Economy,
    /// Mid-size sedan
    Comfort,
    /// High-end vehicle
    Premium,
    /// Six seats or more
    Van,
}

impl VehicleType {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Comfort => "Comfort",
            Self::Premium => "Premium",
            Self::Van => "Van",
        }
    }

    /// All selectable vehicle types, in display order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Economy, Self::Comfort, Self::Premium, Self::Van]
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VehicleType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" | "eco" | "standard" | "compact" => Ok(Self::Economy),
            "comfort" | "sedan" => Ok(Self::Comfort),
            "premium" | "lux" | "luxury" => Ok(Self::Premium),
            "van" | "xl" | "suv" | "minivan" => Ok(Self::Van),
            _ => Err("Invalid vehicle type"),
        }
    }
}
