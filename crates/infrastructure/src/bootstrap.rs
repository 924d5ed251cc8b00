//! Composition root
//!
//! Builds the full service graph from an `AppConfig`. A host UI calls
//! this once and drives the returned session.

use std::sync::Arc;

use ai_core::GeminiEngine;
use application::error::ApplicationError;
use application::ports::{ChatPort, ConnectivityPort, LocationPort, OfferGatewayPort};
use application::services::{ChatSessionService, DriverService, RideService, SessionService};
use integration_geolocation::{
    FixedPositionSource, GeolocationProvider, NominatimReverseGeocoder, PositionSource,
    UnsupportedPositionSource,
};

use crate::adapters::{GenAiChatGateway, GenAiOfferGateway, HttpConnectivityProbe};
use crate::config::AppConfig;

fn configuration_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Configuration(e.to_string())
}

/// Build the session service graph from configuration
pub fn build_session(config: &AppConfig) -> Result<Arc<SessionService>, ApplicationError> {
    // Structured dispatch runs cooler than chat.
    let offer_engine = GeminiEngine::new(config.generation.clone().for_structured_output())
        .map_err(configuration_error)?;
    let chat_engine = GeminiEngine::new(config.generation.clone()).map_err(configuration_error)?;

    let gateway: Arc<dyn OfferGatewayPort> =
        Arc::new(GenAiOfferGateway::new(Arc::new(offer_engine)));
    let chat_port: Arc<dyn ChatPort> = Arc::new(GenAiChatGateway::new(Arc::new(chat_engine)));
    let connectivity: Arc<dyn ConnectivityPort> =
        Arc::new(HttpConnectivityProbe::new(config.connectivity.clone())?);

    let position: Arc<dyn PositionSource> = match config.geolocation.fixed_position {
        Some(fixed) => Arc::new(FixedPositionSource::new(fixed).map_err(configuration_error)?),
        None => Arc::new(UnsupportedPositionSource),
    };
    let geocoder = NominatimReverseGeocoder::new(config.geolocation.geocoder.clone())
        .map_err(configuration_error)?;
    let location: Arc<dyn LocationPort> =
        Arc::new(GeolocationProvider::new(position, Arc::new(geocoder)));

    let passenger = Arc::new(RideService::new(
        Arc::clone(&gateway),
        Arc::clone(&connectivity),
        location,
        config.ride.clone(),
    ));
    let driver = Arc::new(DriverService::new(
        gateway,
        Arc::clone(&connectivity),
        config.driver.clone(),
    ));
    let chat = Arc::new(ChatSessionService::new(chat_port, connectivity));

    Ok(Arc::new(SessionService::new(passenger, driver, chat)))
}
