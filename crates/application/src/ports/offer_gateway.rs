//! Offer gateway port - Interface to the simulated dispatch service
//!
//! Offers arrive fully populated or not at all: a gateway never returns a
//! partially parsed record.

use async_trait::async_trait;
use domain::{RideOffer, VehicleType};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching role-played ride offers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OfferGatewayPort: Send + Sync {
    /// Request a driver match for a passenger
    ///
    /// Returns `Ok(None)` when the dispatch side reports that no drivers
    /// are available right now.
    async fn find_ride(
        &self,
        pickup: &str,
        destination: &str,
        vehicle: VehicleType,
    ) -> Result<Option<RideOffer>, ApplicationError>;

    /// Fetch a simulated incoming passenger request for an online driver
    async fn incoming_request(&self) -> Result<RideOffer, ApplicationError>;
}
