//! Ride offer entity
//!
//! The single live ride proposal of a session: either a driver match shown
//! to a passenger, or an incoming passenger request shown to a driver. A
//! new offer replaces the previous one wholesale; it is never patched.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Fare, Rating, VehicleType};

/// The terms of a prospective ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOffer {
    /// Name of the other party (driver for a match, passenger for a request)
    pub counterpart: String,
    /// The counterpart's star rating
    pub rating: Rating,
    /// Vehicle category (driver matches only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleType>,
    /// License plate (driver matches only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    /// Minutes until the vehicle arrives (driver matches only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<u32>,
    /// Estimated fare
    pub fare: Fare,
    /// Pickup location display string
    pub pickup: String,
    /// Destination display string
    pub destination: String,
}

impl RideOffer {
    /// Create the offer a passenger sees when a driver was matched
    #[allow(clippy::too_many_arguments)]
    pub fn driver_match(
        driver_name: impl Into<String>,
        rating: Rating,
        vehicle: VehicleType,
        license_plate: impl Into<String>,
        eta_minutes: u32,
        fare: Fare,
        pickup: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            counterpart: driver_name.into(),
            rating,
            vehicle: Some(vehicle),
            license_plate: Some(license_plate.into()),
            eta_minutes: Some(eta_minutes),
            fare,
            pickup: pickup.into(),
            destination: destination.into(),
        }
    }

    /// Create the offer a driver sees for an incoming passenger request
    pub fn passenger_request(
        passenger_name: impl Into<String>,
        rating: Rating,
        fare: Fare,
        pickup: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            counterpart: passenger_name.into(),
            rating,
            vehicle: None,
            license_plate: None,
            eta_minutes: None,
            fare,
            pickup: pickup.into(),
            destination: destination.into(),
        }
    }
}
