//! Value Objects - Immutable, identity-less domain primitives

mod conversation_id;
mod driver_status;
mod fare;
mod geo_point;
mod mode;
mod payment_method;
mod rating;
mod ride_status;
mod vehicle_type;

pub use conversation_id::ConversationId;
pub use driver_status::DriverStatus;
pub use fare::Fare;
pub use geo_point::GeoPoint;
pub use mode::Mode;
pub use payment_method::PaymentMethod;
pub use rating::Rating;
pub use ride_status::RideStatus;
pub use vehicle_type::VehicleType;
