//! Ride status value object
//!
//! Represents the passenger-side lifecycle of an active ride search.
//! "No active search" is modeled as the absence of a status
//! (`Option<RideStatus>`), not a variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Passenger ride lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    /// A driver search is in flight
    Searching,
    /// An offer arrived and awaits accept/cancel
    Found,
    /// The ride was accepted and the arrival countdown is running
    Tracking,
    /// The ride finished
    Completed,
    /// The ride was canceled while being tracked
    Canceled,
}

impl RideStatus {
    /// Check whether the ride is still in progress
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Searching | Self::Found | Self::Tracking)
    }

    /// Check whether the ride reached a terminal state
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Searching => "Searching",
            Self::Found => "Driver found",
            Self::Tracking => "Tracking",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
