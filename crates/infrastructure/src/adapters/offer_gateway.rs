//! Offer gateway adapter - Role-played dispatch over the generative engine
//!
//! Builds the two structured prompts (driver match, incoming passenger
//! request), requests schema-constrained JSON, and parses it into a
//! `RideOffer`. The offer is committed atomically: any missing or invalid
//! field rejects the whole response.

use std::sync::Arc;

use ai_core::{FieldKind, GenerationRequest, GenerativeEngine, ResponseSchema};
use application::error::ApplicationError;
use application::ports::OfferGatewayPort;
use async_trait::async_trait;
use domain::{Fare, Rating, RideOffer, VehicleType};
use serde_json::Value;
use tracing::{debug, instrument};

use super::map_generation_error;

/// `OfferGatewayPort` adapter backed by the generative engine
pub struct GenAiOfferGateway {
    engine: Arc<dyn GenerativeEngine>,
}

impl std::fmt::Debug for GenAiOfferGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiOfferGateway").finish_non_exhaustive()
    }
}

impl GenAiOfferGateway {
    /// Create a new gateway
    pub fn new(engine: Arc<dyn GenerativeEngine>) -> Self {
        Self { engine }
    }

    fn ride_offer_schema() -> ResponseSchema {
        ResponseSchema::new()
            .field("status", FieldKind::String)
            .optional_field("driver_name", FieldKind::String)
            .optional_field("rating", FieldKind::Number)
            .optional_field("vehicle_type", FieldKind::String)
            .optional_field("license_plate", FieldKind::String)
            .optional_field("eta_minutes", FieldKind::Number)
            .optional_field("fare", FieldKind::Number)
    }

    fn incoming_request_schema() -> ResponseSchema {
        ResponseSchema::new()
            .field("passenger_name", FieldKind::String)
            .field("rating", FieldKind::Number)
            .field("pickup", FieldKind::String)
            .field("destination", FieldKind::String)
            .field("fare", FieldKind::Number)
    }

    fn find_ride_prompt(pickup: &str, destination: &str, vehicle: VehicleType) -> String {
        format!(
            "You are the dispatch engine of a ride-sharing demo. A rider requests a {vehicle} \
             ride from \"{pickup}\" to \"{destination}\". Invent one plausible nearby driver \
             and answer as JSON. Set status to \"matched\" and fill driver_name, rating (1.0 to \
             5.0), vehicle_type (economy, comfort, premium or van), license_plate, eta_minutes \
             (1 to 15) and fare (estimated fare in USD for this trip). Only when you decide no \
             driver is nearby - which should be rare - set status to \"no_drivers\" and omit \
             the other fields."
        )
    }

    fn incoming_request_prompt() -> String {
        "You are role-playing the dispatch side of a ride-sharing demo for a driver who is \
         online in a city. Invent one plausible incoming passenger request and answer as JSON \
         with passenger_name, rating (1.0 to 5.0), pickup (a street address or landmark), \
         destination (a different street address or landmark) and fare (estimated fare in USD \
         for this trip)."
            .to_string()
    }
}

fn unparseable(detail: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::UnparseableResponse(detail.to_string())
}

/// Strip a markdown code fence the model may wrap its JSON in
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

fn parse_object(content: &str) -> Result<Value, ApplicationError> {
    serde_json::from_str(strip_code_fences(content))
        .map_err(|e| unparseable(format!("invalid JSON: {e}")))
}

fn string_field(object: &Value, name: &str) -> Result<String, ApplicationError> {
    object
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| unparseable(format!("missing field: {name}")))
}

fn number_field(object: &Value, name: &str) -> Result<f64, ApplicationError> {
    object
        .get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| unparseable(format!("missing field: {name}")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_eta(value: f64) -> u32 {
    value.round().clamp(1.0, 120.0) as u32
}

#[async_trait]
impl OfferGatewayPort for GenAiOfferGateway {
    #[instrument(skip(self))]
    async fn find_ride(
        &self,
        pickup: &str,
        destination: &str,
        vehicle: VehicleType,
    ) -> Result<Option<RideOffer>, ApplicationError> {
        let request =
            GenerationRequest::prompt(Self::find_ride_prompt(pickup, destination, vehicle))
                .with_schema(Self::ride_offer_schema());

        let response = self
            .engine
            .generate(request)
            .await
            .map_err(map_generation_error)?;

        let object = parse_object(&response.content)?;
        let status = string_field(&object, "status")?;
        match status.as_str() {
            "no_drivers" => {
                debug!("Dispatch reported no drivers available");
                Ok(None)
            },
            "matched" => {
                let rating =
                    Rating::new(number_field(&object, "rating")?).map_err(unparseable)?;
                let fare =
                    Fare::from_amount(number_field(&object, "fare")?).map_err(unparseable)?;
                let eta_minutes = clamp_eta(number_field(&object, "eta_minutes")?);
                // An off-menu vehicle type falls back to what the rider asked for.
                let vehicle_type = string_field(&object, "vehicle_type")?
                    .parse()
                    .unwrap_or(vehicle);

                Ok(Some(RideOffer::driver_match(
                    string_field(&object, "driver_name")?,
                    rating,
                    vehicle_type,
                    string_field(&object, "license_plate")?,
                    eta_minutes,
                    fare,
                    pickup,
                    destination,
                )))
            },
            other => Err(unparseable(format!("unknown status: {other}"))),
        }
    }

    #[instrument(skip(self))]
    async fn incoming_request(&self) -> Result<RideOffer, ApplicationError> {
        let request = GenerationRequest::prompt(Self::incoming_request_prompt())
            .with_schema(Self::incoming_request_schema());

        let response = self
            .engine
            .generate(request)
            .await
            .map_err(map_generation_error)?;

        let object = parse_object(&response.content)?;
        let rating = Rating::new(number_field(&object, "rating")?).map_err(unparseable)?;
        let fare = Fare::from_amount(number_field(&object, "fare")?).map_err(unparseable)?;

        Ok(RideOffer::passenger_request(
            string_field(&object, "passenger_name")?,
            rating,
            fare,
            string_field(&object, "pickup")?,
            string_field(&object, "destination")?,
        ))
    }
}
