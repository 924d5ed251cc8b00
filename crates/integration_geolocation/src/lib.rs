//! Geolocation integration for Farelane
//!
//! Resolves the device position to a display string behind the
//! application `LocationPort`. A position source yields coordinates (or a
//! denial/timeout/unsupported failure), a reverse geocoder turns them
//! into a place name, and the provider wires both together.

pub mod error;
pub mod position;
pub mod provider;
pub mod reverse_geocode;

pub use error::GeolocationError;
pub use position::{FixedPosition, FixedPositionSource, PositionSource, UnsupportedPositionSource};
pub use provider::{GeolocationConfig, GeolocationProvider};
pub use reverse_geocode::{GeocoderConfig, NominatimReverseGeocoder, ReverseGeocoder};
