//! Ride service - Passenger-side orchestrator
//!
//! Owns the passenger ride lifecycle: search, offer accept/cancel, the
//! tracking countdown, and the editable trip fields. State is mutated in
//! short lock scopes that never span an await; after every await the
//! guard state is re-checked so a late response cannot resurrect a
//! lifecycle that was already torn down.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::{DomainError, PaymentMethod, RideOffer, RideStatus, VehicleType};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ConnectivityPort, LocationPort, OfferGatewayPort};

/// Fallback pickup prompt shown when the device position is unavailable
pub const MANUAL_PICKUP_PROMPT: &str = "Enter pickup location";

const NO_DRIVERS_MESSAGE: &str =
    "No drivers are available right now. Please try again in a few minutes.";

/// Countdown used when an accepted offer carries no ETA
const DEFAULT_TRACKING_MINUTES: u32 = 5;

/// Configuration for the passenger orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideConfig {
    /// Seconds between tracking countdown ticks (default: 60)
    #[serde(default = "default_tracking_tick_secs")]
    pub tracking_tick_secs: u64,
}

const fn default_tracking_tick_secs() -> u64 {
    60
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            tracking_tick_secs: default_tracking_tick_secs(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PassengerState {
    status: Option<RideStatus>,
    offer: Option<RideOffer>,
    pickup: String,
    destination: String,
    vehicle: VehicleType,
    payment: PaymentMethod,
    countdown_minutes: u32,
    status_message: Option<String>,
}

/// Snapshot of the passenger state for presentation
#[derive(Debug, Clone)]
pub struct PassengerView {
    /// Current ride status, `None` when no search is active
    pub status: Option<RideStatus>,
    /// The live offer, if any
    pub offer: Option<RideOffer>,
    /// Pickup field content
    pub pickup: String,
    /// Destination field content
    pub destination: String,
    /// Selected vehicle type
    pub vehicle: VehicleType,
    /// Selected payment method
    pub payment: PaymentMethod,
    /// Minutes left on the tracking countdown
    pub countdown_minutes: u32,
    /// Latest user-facing status or error line
    pub status_message: Option<String>,
}

/// Passenger-side ride orchestrator
pub struct RideService {
    gateway: Arc<dyn OfferGatewayPort>,
    connectivity: Arc<dyn ConnectivityPort>,
    location: Arc<dyn LocationPort>,
    config: RideConfig,
    state: RwLock<PassengerState>,
    tracking_task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for RideService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("RideService")
            .field("status", &state.status)
            .field("has_offer", &state.offer.is_some())
            .finish_non_exhaustive()
    }
}

impl RideService {
    /// Create a new passenger orchestrator
    pub fn new(
        gateway: Arc<dyn OfferGatewayPort>,
        connectivity: Arc<dyn ConnectivityPort>,
        location: Arc<dyn LocationPort>,
        config: RideConfig,
    ) -> Self {
        Self {
            gateway,
            connectivity,
            location,
            config,
            state: RwLock::new(PassengerState::default()),
            tracking_task: Mutex::new(None),
        }
    }

    /// Get a snapshot of the current passenger state
    #[must_use]
    pub fn view(&self) -> PassengerView {
        let state = self.state.read();
        PassengerView {
            status: state.status,
            offer: state.offer.clone(),
            pickup: state.pickup.clone(),
            destination: state.destination.clone(),
            vehicle: state.vehicle,
            payment: state.payment,
            countdown_minutes: state.countdown_minutes,
            status_message: state.status_message.clone(),
        }
    }

    /// Get the current ride status
    #[must_use]
    pub fn status(&self) -> Option<RideStatus> {
        self.state.read().status
    }

    /// Edit the pickup field
    pub fn set_pickup(&self, pickup: impl Into<String>) {
        self.state.write().pickup = pickup.into();
    }

    /// Edit the destination field
    pub fn set_destination(&self, destination: impl Into<String>) {
        self.state.write().destination = destination.into();
    }

    /// Edit the vehicle type
    pub fn set_vehicle(&self, vehicle: VehicleType) {
        self.state.write().vehicle = vehicle;
    }

    /// Edit the payment method
    pub fn set_payment(&self, payment: PaymentMethod) {
        self.state.write().payment = payment;
    }

    /// Prefill the pickup field from the device position
    ///
    /// On any location failure the pickup field is left untouched and the
    /// manual-entry prompt is returned instead.
    #[instrument(skip(self))]
    pub async fn prefill_pickup(&self) -> String {
        match self.location.current_place().await {
            Ok(place) => {
                self.state.write().pickup = place.clone();
                place
            },
            Err(failure) => {
                warn!(failure = %failure, "Falling back to manual pickup entry");
                MANUAL_PICKUP_PROMPT.to_string()
            },
        }
    }

    /// Search for a ride with the current pickup/destination
    ///
    /// Rejects up front when offline or when either field is empty. A
    /// request-layer failure is recovered locally: the status returns to
    /// "no active ride" with a user-facing message, and no partial offer
    /// is ever committed.
    #[instrument(skip(self))]
    pub async fn find_ride(&self) -> Result<(), ApplicationError> {
        if !self.connectivity.is_online().await {
            return Err(ApplicationError::Offline);
        }

        let (pickup, destination, vehicle) = {
            let mut state = self.state.write();
            if let Some(status) = state.status {
                return Err(DomainError::invalid_transition(
                    status.label(),
                    "search for a ride",
                )
                .into());
            }
            if state.pickup.trim().is_empty() {
                return Err(ApplicationError::MissingInput("pickup location".into()));
            }
            if state.destination.trim().is_empty() {
                return Err(ApplicationError::MissingInput("destination".into()));
            }
            state.status = Some(RideStatus::Searching);
            state.offer = None;
            state.status_message = Some("Looking for nearby drivers...".to_string());
            (
                state.pickup.clone(),
                state.destination.clone(),
                state.vehicle,
            )
        };

        let result = self.gateway.find_ride(&pickup, &destination, vehicle).await;

        let mut state = self.state.write();
        if state.status != Some(RideStatus::Searching) {
            debug!("Discarding ride search response; search no longer active");
            return Ok(());
        }

        match result {
            Ok(Some(offer)) => {
                info!(driver = %offer.counterpart, "Driver found");
                state.status = Some(RideStatus::Found);
                state.status_message = Some(format!(
                    "{} can pick you up in {} min",
                    offer.counterpart,
                    offer.eta_minutes.unwrap_or(DEFAULT_TRACKING_MINUTES)
                ));
                state.offer = Some(offer);
            },
            Ok(None) => {
                state.status = None;
                state.offer = None;
                state.status_message = Some(NO_DRIVERS_MESSAGE.to_string());
            },
            Err(e) => {
                warn!(error = %e, "Ride search failed");
                state.status = None;
                state.offer = None;
                state.status_message = Some(format!("Could not find a ride: {e}"));
            },
        }
        Ok(())
    }

    /// Accept the found offer and start tracking the driver's arrival
    #[instrument(skip(self))]
    pub fn accept_offer(self: &Arc<Self>) -> Result<(), ApplicationError> {
        {
            let mut state = self.state.write();
            if state.status != Some(RideStatus::Found) {
                return Err(DomainError::invalid_transition(
                    status_label(state.status),
                    "accept the offer",
                )
                .into());
            }
            let (counterpart, eta) = {
                let offer = state
                    .offer
                    .as_ref()
                    .ok_or_else(|| ApplicationError::Internal("offer missing in Found".into()))?;
                (
                    offer.counterpart.clone(),
                    offer.eta_minutes.unwrap_or(DEFAULT_TRACKING_MINUTES).max(1),
                )
            };
            state.countdown_minutes = eta;
            state.status = Some(RideStatus::Tracking);
            state.status_message = Some(format!("{counterpart} arrives in {eta} min"));
        }
        self.start_tracking_timer();
        Ok(())
    }

    /// Cancel the active search, offer, or tracked ride
    #[instrument(skip(self))]
    pub fn cancel_ride(&self) -> Result<(), ApplicationError> {
        self.stop_tracking_timer();
        let mut state = self.state.write();
        match state.status {
            Some(RideStatus::Searching | RideStatus::Found) => {
                state.status = None;
                state.offer = None;
                state.status_message = Some("Ride canceled.".to_string());
                Ok(())
            },
            Some(RideStatus::Tracking) => {
                state.status = Some(RideStatus::Canceled);
                state.offer = None;
                state.countdown_minutes = 0;
                state.status_message = Some("Ride canceled.".to_string());
                Ok(())
            },
            other => Err(DomainError::invalid_transition(
                status_label(other),
                "cancel the ride",
            )
            .into()),
        }
    }

    /// Complete the tracked ride explicitly
    #[instrument(skip(self))]
    pub fn complete_ride(&self) -> Result<(), ApplicationError> {
        self.stop_tracking_timer();
        let mut state = self.state.write();
        if state.status != Some(RideStatus::Tracking) {
            return Err(DomainError::invalid_transition(
                status_label(state.status),
                "complete the ride",
            )
            .into());
        }
        finish_ride(&mut state);
        Ok(())
    }

    /// Clear the whole passenger lifecycle back to its initial state
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.stop_tracking_timer();
        *self.state.write() = PassengerState::default();
    }

    /// One tracking countdown tick; returns whether the timer should stop
    fn tracking_tick(&self) -> bool {
        let mut state = self.state.write();
        if state.status != Some(RideStatus::Tracking) {
            // Stale timer; the lifecycle already moved on.
            return true;
        }
        state.countdown_minutes = state.countdown_minutes.saturating_sub(1);
        if state.countdown_minutes == 0 {
            finish_ride(&mut state);
            true
        } else {
            let driver = state
                .offer
                .as_ref()
                .map_or_else(|| "Your driver".to_string(), |o| o.counterpart.clone());
            state.status_message =
                Some(format!("{driver} arrives in {} min", state.countdown_minutes));
            false
        }
    }

    fn start_tracking_timer(self: &Arc<Self>) {
        let service = Arc::clone(self);
        let period = Duration::from_secs(self.config.tracking_tick_secs);
        let mut guard = self.tracking_task.lock();
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first interval tick fires immediately; skip it so the
            // countdown decrements once per period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if service.tracking_tick() {
                    break;
                }
            }
        }));
    }

    fn stop_tracking_timer(&self) {
        if let Some(handle) = self.tracking_task.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for RideService {
    fn drop(&mut self) {
        self.stop_tracking_timer();
    }
}

fn status_label(status: Option<RideStatus>) -> &'static str {
    status.map_or("no active ride", |s| s.label())
}

fn finish_ride(state: &mut PassengerState) {
    let fare = state.offer.as_ref().map(|o| o.fare);
    state.status = Some(RideStatus::Completed);
    state.offer = None;
    state.countdown_minutes = 0;
    state.status_message = Some(match fare {
        Some(fare) => format!(
            "You have arrived at {}. Fare: {fare}",
            state.destination
        ),
        None => format!("You have arrived at {}.", state.destination),
    });
}
