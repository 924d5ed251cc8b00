//! Position sources
//!
//! Headless stand-ins for device geolocation. A host UI with a real
//! position API provides its own `PositionSource`; the shipped sources
//! cover a configured fixed position and the no-hardware case.

use async_trait::async_trait;
use domain::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::error::GeolocationError;

/// Source of the current device position
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Get the current position
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError>;
}

/// A configured, fixed position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPosition {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Position source that always yields the configured position
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    point: GeoPoint,
}

impl FixedPositionSource {
    /// Create a source from validated coordinates
    pub fn new(position: FixedPosition) -> Result<Self, GeolocationError> {
        let point = GeoPoint::new(position.latitude, position.longitude)
            .map_err(|e| GeolocationError::ParseError(e.to_string()))?;
        Ok(Self { point })
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Ok(self.point)
    }
}

/// Position source for hosts without any position hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositionSource;

#[async_trait]
impl PositionSource for UnsupportedPositionSource {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
