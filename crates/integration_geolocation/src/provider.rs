//! Geolocation provider - `LocationPort` adapter
//!
//! Wires a position source and a reverse geocoder into the application's
//! `LocationPort`. Failures map onto the port's taxonomy; the manual-entry
//! fallback policy stays with the orchestrator.

use std::sync::Arc;

use application::ports::{LocationFailure, LocationPort};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GeolocationError;
use crate::position::{FixedPosition, PositionSource};
use crate::reverse_geocode::{GeocoderConfig, ReverseGeocoder};

/// Configuration for the geolocation integration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Reverse geocoder settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Fixed position to report; absent means geolocation is unsupported
    #[serde(default)]
    pub fixed_position: Option<FixedPosition>,
}

/// `LocationPort` adapter combining a position source and a geocoder
pub struct GeolocationProvider {
    source: Arc<dyn PositionSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl std::fmt::Debug for GeolocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeolocationProvider").finish_non_exhaustive()
    }
}

impl GeolocationProvider {
    /// Create a new provider
    pub fn new(source: Arc<dyn PositionSource>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { source, geocoder }
    }
}

fn to_failure(error: GeolocationError) -> LocationFailure {
    match error {
        GeolocationError::PermissionDenied => LocationFailure::PermissionDenied,
        GeolocationError::Timeout => LocationFailure::Timeout,
        GeolocationError::Unsupported => LocationFailure::Unsupported,
        other => LocationFailure::Lookup(other.to_string()),
    }
}

#[async_trait]
impl LocationPort for GeolocationProvider {
    #[instrument(skip(self))]
    async fn current_place(&self) -> Result<String, LocationFailure> {
        let point = self
            .source
            .current_position()
            .await
            .map_err(to_failure)?;
        self.geocoder
            .display_name(point)
            .await
            .map_err(to_failure)
    }
}
