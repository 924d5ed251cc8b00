//! Driver status value object
//!
//! Represents the driver-side lifecycle of a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Driver lifecycle status
///
/// Owned exclusively by the driver orchestrator and mutated only through
/// its defined transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    /// Not accepting requests
    #[default]
    Offline,
    /// Waiting for incoming ride requests
    Online,
    /// An incoming request is awaiting accept/decline
    RequestPending,
    /// Driving an accepted trip
    OnRide,
    /// The last trip finished; driver has not gone back online yet
    RideCompleted,
}

impl DriverStatus {
    /// Check whether the driver participates in dispatch at all
    #[must_use]
    pub const fn is_on_duty(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Check whether the polling timer may issue a request fetch
    ///
    /// Only plain `Online` qualifies: a pending request or an active ride
    /// means an offer is live and no new fetch may be issued.
    #[must_use]
    pub const fn accepts_new_requests(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Offline => "Offline",
            Self::Online => "Online",
            Self::RequestPending => "Request pending",
            Self::OnRide => "On ride",
            Self::RideCompleted => "Ride completed",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
