use tracing::{debug, info};

use crate::catalogue::CabinClass;
use crate::query::{AcceptedQuery, ItineraryQuery, ValidatedItinerary};
use crate::rules::{RuleEngine, Violation};

/// Validates flight searches and remembers the last one it accepted.
///
/// Every call starts by forgetting the previous itinerary, so after a
/// rejection all accessors report defaults. Not meant to be shared between
/// threads while a search is running; hold one per caller instead.
#[derive(Debug, Clone, Default)]
pub struct FlightSearch {
    engine: RuleEngine,
    state: AcceptedQuery,
}

impl FlightSearch {
    /// Default airport catalogue, measured against the local calendar date.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: RuleEngine) -> Self {
        Self {
            engine,
            state: AcceptedQuery::Default,
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Returns true and stores the itinerary iff every rule holds.
    #[allow(clippy::too_many_arguments)]
    pub fn run_flight_search(
        &mut self,
        departure_date: &str,
        departure_airport_code: &str,
        emergency_row_seating: bool,
        return_date: &str,
        destination_airport_code: &str,
        seating_class: &str,
        adult_passenger_count: i32,
        child_passenger_count: i32,
        infant_passenger_count: i32,
    ) -> bool {
        let query = ItineraryQuery::new(
            departure_date,
            departure_airport_code,
            emergency_row_seating,
            return_date,
            destination_airport_code,
            seating_class,
            adult_passenger_count,
            child_passenger_count,
            infant_passenger_count,
        );
        self.submit(&query)
    }

    /// Same contract as [`run_flight_search`](Self::run_flight_search) for a prebuilt query.
    pub fn submit(&mut self, query: &ItineraryQuery) -> bool {
        self.reset();

        match self.engine.first_violation(query) {
            Ok(itinerary) => {
                self.commit(itinerary);
                true
            }
            Err(violation) => {
                debug!(code = violation.code(), "Flight search rejected: {}", violation);
                false
            }
        }
    }

    /// Like [`submit`](Self::submit) but reports every broken rule on rejection.
    pub fn explain(&mut self, query: &ItineraryQuery) -> Result<(), Vec<Violation>> {
        self.reset();

        match self.engine.evaluate(query) {
            Ok(itinerary) => {
                self.commit(itinerary);
                Ok(())
            }
            Err(violations) => {
                debug!(
                    count = violations.len(),
                    first = violations.first().map(Violation::code),
                    "Flight search rejected"
                );
                Err(violations)
            }
        }
    }

    fn reset(&mut self) {
        self.state = AcceptedQuery::Default;
    }

    fn commit(&mut self, itinerary: ValidatedItinerary) {
        info!(
            from = itinerary.departure_airport_code(),
            to = itinerary.destination_airport_code(),
            passengers = itinerary.total_passengers(),
            "Flight search accepted"
        );
        self.state = AcceptedQuery::Accepted(itinerary);
    }

    pub fn state(&self) -> &AcceptedQuery {
        &self.state
    }

    pub fn is_accepted(&self) -> bool {
        self.state.is_accepted()
    }

    pub fn accepted(&self) -> Option<&ValidatedItinerary> {
        self.state.itinerary()
    }

    pub fn departure_date(&self) -> Option<&str> {
        self.accepted().map(ValidatedItinerary::departure_date)
    }

    pub fn departure_airport_code(&self) -> Option<&str> {
        self.accepted().map(ValidatedItinerary::departure_airport_code)
    }

    pub fn is_emergency_row_seating(&self) -> bool {
        self.accepted()
            .map(ValidatedItinerary::is_emergency_row_seating)
            .unwrap_or(false)
    }

    pub fn return_date(&self) -> Option<&str> {
        self.accepted().map(ValidatedItinerary::return_date)
    }

    pub fn destination_airport_code(&self) -> Option<&str> {
        self.accepted().map(ValidatedItinerary::destination_airport_code)
    }

    pub fn seating_class(&self) -> Option<CabinClass> {
        self.accepted().map(ValidatedItinerary::seating_class)
    }

    pub fn adult_passenger_count(&self) -> u32 {
        self.accepted()
            .map(ValidatedItinerary::adult_passenger_count)
            .unwrap_or(0)
    }

    pub fn child_passenger_count(&self) -> u32 {
        self.accepted()
            .map(ValidatedItinerary::child_passenger_count)
            .unwrap_or(0)
    }

    pub fn infant_passenger_count(&self) -> u32 {
        self.accepted()
            .map(ValidatedItinerary::infant_passenger_count)
            .unwrap_or(0)
    }
}
