pub mod catalogue;
pub mod clock;
pub mod date;
pub mod query;
pub mod rules;
pub mod search;

pub use catalogue::{AirportCatalogue, CabinClass};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{parse_travel_date, DateError};
pub use query::{AcceptedQuery, ItineraryQuery, ValidatedItinerary};
pub use rules::{DateField, RuleEngine, Violation};
pub use search::FlightSearch;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
