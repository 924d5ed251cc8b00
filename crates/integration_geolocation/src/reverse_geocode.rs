//! Nominatim reverse geocoding client
//!
//! Converts coordinates to a human-readable place string using a
//! [Nominatim](https://nominatim.openstreetmap.org) compatible API, with
//! result caching to minimize API calls.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoPoint;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GeolocationError;

/// Configuration for the reverse geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_geocoder_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Nominatim zoom level (higher = more detail)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoder_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_zoom() -> u8 {
    16
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            timeout_secs: default_geocoder_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            zoom: default_zoom(),
        }
    }
}

impl GeocoderConfig {
    /// Create a configuration suitable for testing (caching disabled)
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cache_ttl_hours: 0,
            ..Default::default()
        }
    }
}

/// Trait for reverse geocoding clients
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Convert coordinates to a human-readable place string
    async fn display_name(&self, point: GeoPoint) -> Result<String, GeolocationError>;
}

/// Nominatim response payload (the subset we read)
#[derive(Debug, Deserialize)]
struct NominatimReverseResponse {
    display_name: Option<String>,
}

/// Reverse geocoder backed by the Nominatim HTTP API
pub struct NominatimReverseGeocoder {
    client: Client,
    config: GeocoderConfig,
    cache: Option<Cache<String, String>>,
}

impl std::fmt::Debug for NominatimReverseGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimReverseGeocoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NominatimReverseGeocoder {
    /// Create a new reverse geocoder
    pub fn new(config: GeocoderConfig) -> Result<Self, GeolocationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("farelane-demo/0.2")
            .build()
            .map_err(|e| GeolocationError::ConnectionFailed(e.to_string()))?;

        let cache = (config.cache_ttl_hours > 0).then(|| {
            Cache::builder()
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .max_capacity(1024)
                .build()
        });

        Ok(Self {
            client,
            config,
            cache,
        })
    }

    fn cache_key(point: GeoPoint) -> String {
        format!("{:.5},{:.5}", point.latitude(), point.longitude())
    }

    async fn fetch_display_name(&self, point: GeoPoint) -> Result<String, GeolocationError> {
        let response = self
            .client
            .get(format!(
                "{}/reverse",
                self.config.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("lat", point.latitude().to_string()),
                ("lon", point.longitude().to_string()),
                ("zoom", self.config.zoom.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeolocationError::RequestFailed(
                response.status().to_string(),
            ));
        }

        let body: NominatimReverseResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::ParseError(e.to_string()))?;

        body.display_name.ok_or(GeolocationError::NotFound)
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimReverseGeocoder {
    #[instrument(skip(self), fields(point = %point))]
    async fn display_name(&self, point: GeoPoint) -> Result<String, GeolocationError> {
        let key = Self::cache_key(point);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                debug!("Reverse geocode cache hit");
                return Ok(cached);
            }
        }

        let name = self.fetch_display_name(point).await?;

        if let Some(cache) = &self.cache {
            cache.insert(key, name.clone()).await;
        }

        Ok(name)
    }
}
