use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalogue::CabinClass;

/// A tentative itinerary as submitted by a caller.
///
/// Nothing here is trusted: strings may be absent or misspelled and counts
/// may be negative. The rule engine turns it into a [`ValidatedItinerary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryQuery {
    pub departure_date: Option<String>,
    pub departure_airport_code: Option<String>,
    pub emergency_row_seating: bool,
    pub return_date: Option<String>,
    pub destination_airport_code: Option<String>,
    pub seating_class: Option<String>,
    pub adult_passenger_count: i32,
    pub child_passenger_count: i32,
    pub infant_passenger_count: i32,
}

impl ItineraryQuery {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        departure_date: &str,
        departure_airport_code: &str,
        emergency_row_seating: bool,
        return_date: &str,
        destination_airport_code: &str,
        seating_class: &str,
        adult_passenger_count: i32,
        child_passenger_count: i32,
        infant_passenger_count: i32,
    ) -> Self {
        Self {
            departure_date: Some(departure_date.to_string()),
            departure_airport_code: Some(departure_airport_code.to_string()),
            emergency_row_seating,
            return_date: Some(return_date.to_string()),
            destination_airport_code: Some(destination_airport_code.to_string()),
            seating_class: Some(seating_class.to_string()),
            adult_passenger_count,
            child_passenger_count,
            infant_passenger_count,
        }
    }

    /// Passenger total, widened so that extreme inputs cannot overflow.
    pub fn total_passengers(&self) -> i64 {
        i64::from(self.adult_passenger_count)
            + i64::from(self.child_passenger_count)
            + i64::from(self.infant_passenger_count)
    }
}

/// An itinerary that has passed every rule. Only the rule engine builds these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedItinerary {
    pub(crate) departure_date: String,
    pub(crate) departure_on: NaiveDate,
    pub(crate) departure_airport_code: String,
    pub(crate) emergency_row_seating: bool,
    pub(crate) return_date: String,
    pub(crate) return_on: NaiveDate,
    pub(crate) destination_airport_code: String,
    pub(crate) seating_class: CabinClass,
    pub(crate) adult_passenger_count: u32,
    pub(crate) child_passenger_count: u32,
    pub(crate) infant_passenger_count: u32,
}

impl ValidatedItinerary {
    pub fn departure_date(&self) -> &str {
        &self.departure_date
    }

    pub fn departure_on(&self) -> NaiveDate {
        self.departure_on
    }

    pub fn departure_airport_code(&self) -> &str {
        &self.departure_airport_code
    }

    pub fn is_emergency_row_seating(&self) -> bool {
        self.emergency_row_seating
    }

    pub fn return_date(&self) -> &str {
        &self.return_date
    }

    pub fn return_on(&self) -> NaiveDate {
        self.return_on
    }

    pub fn destination_airport_code(&self) -> &str {
        &self.destination_airport_code
    }

    pub fn seating_class(&self) -> CabinClass {
        self.seating_class
    }

    pub fn adult_passenger_count(&self) -> u32 {
        self.adult_passenger_count
    }

    pub fn child_passenger_count(&self) -> u32 {
        self.child_passenger_count
    }

    pub fn infant_passenger_count(&self) -> u32 {
        self.infant_passenger_count
    }

    pub fn total_passengers(&self) -> u32 {
        self.adult_passenger_count + self.child_passenger_count + self.infant_passenger_count
    }

    /// Length of stay in nights. Always at least one.
    pub fn nights(&self) -> i64 {
        (self.return_on - self.departure_on).num_days()
    }

    /// The query this itinerary was accepted from.
    pub fn to_query(&self) -> ItineraryQuery {
        ItineraryQuery {
            departure_date: Some(self.departure_date.clone()),
            departure_airport_code: Some(self.departure_airport_code.clone()),
            emergency_row_seating: self.emergency_row_seating,
            return_date: Some(self.return_date.clone()),
            destination_airport_code: Some(self.destination_airport_code.clone()),
            seating_class: Some(self.seating_class.as_str().to_string()),
            adult_passenger_count: self.adult_passenger_count as i32,
            child_passenger_count: self.child_passenger_count as i32,
            infant_passenger_count: self.infant_passenger_count as i32,
        }
    }
}

/// What a validator currently holds: nothing, or the last accepted itinerary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AcceptedQuery {
    #[default]
    Default,
    Accepted(ValidatedItinerary),
}

impl AcceptedQuery {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AcceptedQuery::Accepted(_))
    }

    pub fn itinerary(&self) -> Option<&ValidatedItinerary> {
        match self {
            AcceptedQuery::Default => None,
            AcceptedQuery::Accepted(itinerary) => Some(itinerary),
        }
    }
}
