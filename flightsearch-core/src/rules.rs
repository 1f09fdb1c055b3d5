use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalogue::{AirportCatalogue, CabinClass};
use crate::clock::{Clock, SystemClock};
use crate::date::{parse_optional_travel_date, DateError};
use crate::query::{ItineraryQuery, ValidatedItinerary};

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 9;
pub const MAX_CHILDREN_PER_ADULT: i64 = 2;
pub const MAX_INFANTS_PER_ADULT: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    Departure,
    Return,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Departure => f.write_str("departure"),
            DateField::Return => f.write_str("return"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerKind {
    Adult,
    Child,
    Infant,
}

impl fmt::Display for PassengerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerKind::Adult => f.write_str("adult"),
            PassengerKind::Child => f.write_str("child"),
            PassengerKind::Infant => f.write_str("infant"),
        }
    }
}

/// A business rule an itinerary broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Passenger counts cannot be negative: {count} {kind}")]
    NegativePassengerCount { kind: PassengerKind, count: i32 },

    #[error("Passenger total must be between 1 and 9, got {total}")]
    PassengerTotal { total: i64 },

    #[error("Too many children: {children} for {adults} adults")]
    TooManyChildren { adults: i32, children: i32 },

    #[error("Too many infants: {infants} for {adults} adults")]
    TooManyInfants { adults: i32, infants: i32 },

    #[error("Children cannot sit in emergency rows or first class")]
    ChildrenNotPermitted,

    #[error("Infants cannot sit in emergency rows or business class")]
    InfantsNotPermitted,

    #[error("Unknown seating class: {}", .0.as_deref().unwrap_or("<none>"))]
    UnknownSeatingClass(Option<String>),

    #[error("Emergency row seating is only offered in economy, not {0}")]
    EmergencyRowRequiresEconomy(CabinClass),

    #[error("Unknown airport code: {}", .0.as_deref().unwrap_or("<none>"))]
    UnknownAirport(Option<String>),

    #[error("Departure and destination are the same airport: {0}")]
    SameAirport(String),

    #[error("Invalid {field} date: {source}")]
    InvalidDate {
        field: DateField,
        #[source]
        source: DateError,
    },

    #[error("Departure {departure} is before today ({today})")]
    DepartureInPast { departure: NaiveDate, today: NaiveDate },

    #[error("Return {return_on} must be after departure {departure}")]
    ReturnNotAfterDeparture {
        departure: NaiveDate,
        return_on: NaiveDate,
    },
}

impl Violation {
    /// Stable identifier for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::NegativePassengerCount { .. } => "NEGATIVE_PASSENGER_COUNT",
            Violation::PassengerTotal { .. } => "PASSENGER_TOTAL",
            Violation::TooManyChildren { .. } => "TOO_MANY_CHILDREN",
            Violation::TooManyInfants { .. } => "TOO_MANY_INFANTS",
            Violation::ChildrenNotPermitted => "CHILDREN_NOT_PERMITTED",
            Violation::InfantsNotPermitted => "INFANTS_NOT_PERMITTED",
            Violation::UnknownSeatingClass(_) => "UNKNOWN_SEATING_CLASS",
            Violation::EmergencyRowRequiresEconomy(_) => "EMERGENCY_ROW_REQUIRES_ECONOMY",
            Violation::UnknownAirport(_) => "UNKNOWN_AIRPORT",
            Violation::SameAirport(_) => "SAME_AIRPORT",
            Violation::InvalidDate { .. } => "INVALID_DATE",
            Violation::DepartureInPast { .. } => "DEPARTURE_IN_PAST",
            Violation::ReturnNotAfterDeparture { .. } => "RETURN_NOT_AFTER_DEPARTURE",
        }
    }

    /// Which of the eleven accepted-query invariants this violation breaks.
    pub fn invariant(&self) -> u8 {
        match self {
            Violation::NegativePassengerCount { .. } | Violation::PassengerTotal { .. } => 1,
            Violation::TooManyChildren { .. } => 2,
            Violation::TooManyInfants { .. } => 3,
            Violation::ChildrenNotPermitted => 4,
            Violation::InfantsNotPermitted => 5,
            Violation::UnknownSeatingClass(_) => 6,
            Violation::EmergencyRowRequiresEconomy(_) => 7,
            Violation::UnknownAirport(_) | Violation::SameAirport(_) => 8,
            Violation::InvalidDate { .. } => 9,
            Violation::DepartureInPast { .. } => 10,
            Violation::ReturnNotAfterDeparture { .. } => 11,
        }
    }
}

/// Either stops at the first violation or keeps going and records them all.
struct Findings {
    collect: bool,
    all: Vec<Violation>,
}

impl Findings {
    fn short_circuit() -> Self {
        Self { collect: false, all: Vec::new() }
    }

    fn collecting() -> Self {
        Self { collect: true, all: Vec::new() }
    }

    /// Returns the violation back when evaluation should stop here.
    fn record(&mut self, violation: Violation) -> Option<Violation> {
        if self.collect {
            self.all.push(violation);
            None
        } else {
            Some(violation)
        }
    }
}

macro_rules! reject {
    ($findings:expr, $violation:expr) => {
        if let Some(violation) = $findings.record($violation) {
            return Err(violation);
        }
    };
}

/// Decides whether an itinerary is acceptable.
///
/// Rules run in a fixed order and later rules rely on earlier ones having
/// passed, e.g. the temporal rules only ever see well-formed dates.
#[derive(Clone)]
pub struct RuleEngine {
    airports: AirportCatalogue,
    clock: Arc<dyn Clock>,
}

impl RuleEngine {
    pub fn new(airports: AirportCatalogue, clock: Arc<dyn Clock>) -> Self {
        Self { airports, clock }
    }

    pub fn airports(&self) -> &AirportCatalogue {
        &self.airports
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validate the query, stopping at the first broken rule.
    pub fn first_violation(&self, query: &ItineraryQuery) -> Result<ValidatedItinerary, Violation> {
        self.walk(query, &mut Findings::short_circuit())
    }

    /// Validate the query, reporting every broken rule in evaluation order.
    pub fn evaluate(&self, query: &ItineraryQuery) -> Result<ValidatedItinerary, Vec<Violation>> {
        let mut findings = Findings::collecting();
        match self.walk(query, &mut findings) {
            Ok(itinerary) => Ok(itinerary),
            Err(_) => Err(findings.all),
        }
    }

    /// Every broken rule, in evaluation order. Empty iff the query is acceptable.
    pub fn all_violations(&self, query: &ItineraryQuery) -> Vec<Violation> {
        self.evaluate(query).err().unwrap_or_default()
    }

    fn walk(
        &self,
        query: &ItineraryQuery,
        findings: &mut Findings,
    ) -> Result<ValidatedItinerary, Violation> {
        let adults = i64::from(query.adult_passenger_count);
        let children = i64::from(query.child_passenger_count);
        let infants = i64::from(query.infant_passenger_count);

        // 1. passenger total
        for (kind, count) in [
            (PassengerKind::Adult, query.adult_passenger_count),
            (PassengerKind::Child, query.child_passenger_count),
            (PassengerKind::Infant, query.infant_passenger_count),
        ] {
            if count < 0 {
                reject!(findings, Violation::NegativePassengerCount { kind, count });
            }
        }
        let total = query.total_passengers();
        if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&total) {
            reject!(findings, Violation::PassengerTotal { total });
        }

        // 2. ratios
        if children > MAX_CHILDREN_PER_ADULT * adults {
            reject!(
                findings,
                Violation::TooManyChildren {
                    adults: query.adult_passenger_count,
                    children: query.child_passenger_count,
                }
            );
        }
        if infants > MAX_INFANTS_PER_ADULT * adults {
            reject!(
                findings,
                Violation::TooManyInfants {
                    adults: query.adult_passenger_count,
                    infants: query.infant_passenger_count,
                }
            );
        }

        let seating_class = query
            .seating_class
            .as_deref()
            .and_then(|raw| CabinClass::from_str(raw).ok());
        let emergency = query.emergency_row_seating;

        // 3. no children in emergency rows or first
        if (emergency || seating_class == Some(CabinClass::First)) && children > 0 {
            reject!(findings, Violation::ChildrenNotPermitted);
        }

        // 4. no infants in emergency rows or business
        if (emergency || seating_class == Some(CabinClass::Business)) && infants > 0 {
            reject!(findings, Violation::InfantsNotPermitted);
        }

        // 5. cabin must be known
        if seating_class.is_none() {
            reject!(findings, Violation::UnknownSeatingClass(query.seating_class.clone()));
        }

        // 6. emergency rows only in economy
        if let Some(class) = seating_class {
            if emergency && class != CabinClass::Economy {
                reject!(findings, Violation::EmergencyRowRequiresEconomy(class));
            }
        }

        // 7. airports known and distinct
        let departure_code = self.known_airport(query.departure_airport_code.as_deref());
        if departure_code.is_none() {
            reject!(findings, Violation::UnknownAirport(query.departure_airport_code.clone()));
        }
        let destination_code = self.known_airport(query.destination_airport_code.as_deref());
        if destination_code.is_none() {
            reject!(findings, Violation::UnknownAirport(query.destination_airport_code.clone()));
        }
        if let (Some(from), Some(to)) = (departure_code, destination_code) {
            if from == to {
                reject!(findings, Violation::SameAirport(from.to_string()));
            }
        }

        // 8. dates well formed
        let departure_on = parse_optional_travel_date(query.departure_date.as_deref());
        if let Err(source) = &departure_on {
            reject!(
                findings,
                Violation::InvalidDate { field: DateField::Departure, source: source.clone() }
            );
        }
        let return_on = parse_optional_travel_date(query.return_date.as_deref());
        if let Err(source) = &return_on {
            reject!(
                findings,
                Violation::InvalidDate { field: DateField::Return, source: source.clone() }
            );
        }

        if let (Ok(departure), Ok(return_on)) = (&departure_on, &return_on) {
            let (departure, return_on) = (*departure, *return_on);

            // 9. departure today or later
            let today = self.clock.today();
            if departure < today {
                reject!(findings, Violation::DepartureInPast { departure, today });
            }

            // 10. return strictly after departure
            if return_on <= departure {
                reject!(findings, Violation::ReturnNotAfterDeparture { departure, return_on });
            }
        }

        if let Some(first) = findings.all.first() {
            return Err(first.clone());
        }

        let (Some(seating_class), Some(departure_code), Some(destination_code), Ok(departure_on), Ok(return_on)) =
            (seating_class, departure_code, destination_code, departure_on, return_on)
        else {
            unreachable!("every missing field records a violation above");
        };

        Ok(ValidatedItinerary {
            departure_date: query.departure_date.clone().unwrap_or_default(),
            departure_on,
            departure_airport_code: departure_code.to_string(),
            emergency_row_seating: emergency,
            return_date: query.return_date.clone().unwrap_or_default(),
            return_on,
            destination_airport_code: destination_code.to_string(),
            seating_class,
            adult_passenger_count: adults as u32,
            child_passenger_count: children as u32,
            infant_passenger_count: infants as u32,
        })
    }

    fn known_airport<'a>(&self, code: Option<&'a str>) -> Option<&'a str> {
        code.filter(|code| self.airports.contains(code))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(AirportCatalogue::default(), Arc::new(SystemClock))
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("airports", &self.airports)
            .field("today", &self.clock.today())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn engine() -> RuleEngine {
        RuleEngine::new(AirportCatalogue::default(), Arc::new(FixedClock::reference()))
    }

    fn valid() -> ItineraryQuery {
        ItineraryQuery::new("19/10/2025", "syd", false, "20/10/2025", "mel", "economy", 1, 0, 0)
    }

    fn only_violation(query: ItineraryQuery) -> Violation {
        let engine = engine();
        let all = engine.all_violations(&query);
        assert_eq!(all.len(), 1, "expected exactly one violation, got {all:?}");
        let first = engine.first_violation(&query).unwrap_err();
        assert_eq!(first, all[0]);
        first
    }

    #[test]
    fn test_valid_query_is_accepted() {
        let itinerary = engine().first_violation(&valid()).unwrap();
        assert_eq!(itinerary.departure_airport_code(), "syd");
        assert_eq!(itinerary.seating_class(), CabinClass::Economy);
        assert_eq!(itinerary.nights(), 1);
        assert_eq!(itinerary.to_query(), valid());
        assert!(engine().all_violations(&valid()).is_empty());
    }

    #[test]
    fn test_each_invariant_can_fire_alone() {
        let mut q = valid();
        q.adult_passenger_count = 10;
        assert_eq!(only_violation(q).invariant(), 1);

        let mut q = valid();
        q.child_passenger_count = 3;
        assert_eq!(only_violation(q).invariant(), 2);

        let mut q = valid();
        q.infant_passenger_count = 2;
        q.adult_passenger_count = 1;
        assert_eq!(only_violation(q).invariant(), 3);

        let mut q = valid();
        q.seating_class = Some("first".into());
        q.child_passenger_count = 1;
        assert_eq!(only_violation(q), Violation::ChildrenNotPermitted);

        let mut q = valid();
        q.seating_class = Some("business".into());
        q.infant_passenger_count = 1;
        assert_eq!(only_violation(q), Violation::InfantsNotPermitted);

        let mut q = valid();
        q.seating_class = Some("Economy".into());
        assert_eq!(only_violation(q).invariant(), 6);

        let mut q = valid();
        q.emergency_row_seating = true;
        q.seating_class = Some("premium economy".into());
        assert_eq!(
            only_violation(q),
            Violation::EmergencyRowRequiresEconomy(CabinClass::PremiumEconomy)
        );

        let mut q = valid();
        q.destination_airport_code = Some("syd".into());
        assert_eq!(only_violation(q), Violation::SameAirport("syd".into()));

        let mut q = valid();
        q.departure_airport_code = Some("jfk".into());
        assert_eq!(only_violation(q), Violation::UnknownAirport(Some("jfk".into())));

        let mut q = valid();
        q.return_date = Some("31/11/2025".into());
        assert_eq!(only_violation(q).invariant(), 9);

        let mut q = valid();
        q.departure_date = Some("17/10/2025".into());
        assert_eq!(only_violation(q).invariant(), 10);

        let mut q = valid();
        q.return_date = Some("19/10/2025".into());
        assert_eq!(only_violation(q).invariant(), 11);
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let mut q = valid();
        q.adult_passenger_count = 2;
        q.child_passenger_count = -1;
        assert_eq!(
            only_violation(q),
            Violation::NegativePassengerCount { kind: PassengerKind::Child, count: -1 }
        );

        let mut q = valid();
        q.adult_passenger_count = -1;
        let first = engine().first_violation(&q).unwrap_err();
        assert_eq!(first.code(), "NEGATIVE_PASSENGER_COUNT");
    }

    #[test]
    fn test_zero_adults_with_dependants() {
        let mut q = valid();
        q.adult_passenger_count = 0;
        q.child_passenger_count = 1;
        assert_eq!(
            engine().first_violation(&q).unwrap_err(),
            Violation::TooManyChildren { adults: 0, children: 1 }
        );

        let mut q = valid();
        q.adult_passenger_count = 0;
        q.infant_passenger_count = 1;
        assert_eq!(
            engine().first_violation(&q).unwrap_err(),
            Violation::TooManyInfants { adults: 0, infants: 1 }
        );
    }

    #[test]
    fn test_emergency_row_restrictions() {
        let mut q = valid();
        q.emergency_row_seating = true;
        q.adult_passenger_count = 2;
        q.child_passenger_count = 1;
        assert_eq!(engine().first_violation(&q).unwrap_err(), Violation::ChildrenNotPermitted);

        let mut q = valid();
        q.emergency_row_seating = true;
        q.infant_passenger_count = 1;
        assert_eq!(engine().first_violation(&q).unwrap_err(), Violation::InfantsNotPermitted);

        // Non-economy cabins are refused even for a lone adult.
        let mut q = valid();
        q.emergency_row_seating = true;
        q.seating_class = Some("first".into());
        assert_eq!(
            engine().first_violation(&q).unwrap_err(),
            Violation::EmergencyRowRequiresEconomy(CabinClass::First)
        );
    }

    #[test]
    fn test_evaluation_order_with_several_violations() {
        let q = ItineraryQuery {
            departure_date: Some("17/10/2025".into()),
            departure_airport_code: Some("SYD".into()),
            emergency_row_seating: true,
            return_date: Some("bad".into()),
            destination_airport_code: None,
            seating_class: Some("business".into()),
            adult_passenger_count: 1,
            child_passenger_count: 0,
            infant_passenger_count: 0,
        };
        let engine = engine();
        let codes: Vec<_> = engine.all_violations(&q).iter().map(Violation::code).collect();
        assert_eq!(
            codes,
            vec![
                "EMERGENCY_ROW_REQUIRES_ECONOMY",
                "UNKNOWN_AIRPORT",
                "UNKNOWN_AIRPORT",
                "INVALID_DATE",
            ]
        );
        assert_eq!(
            engine.first_violation(&q).unwrap_err(),
            Violation::EmergencyRowRequiresEconomy(CabinClass::Business)
        );
    }

    #[test]
    fn test_absent_fields_are_rejected() {
        let engine = engine();
        let all = engine.all_violations(&ItineraryQuery::default());
        let codes: Vec<_> = all.iter().map(Violation::code).collect();
        assert_eq!(
            codes,
            vec![
                "PASSENGER_TOTAL",
                "UNKNOWN_SEATING_CLASS",
                "UNKNOWN_AIRPORT",
                "UNKNOWN_AIRPORT",
                "INVALID_DATE",
                "INVALID_DATE",
            ]
        );
        assert_eq!(
            all[4],
            Violation::InvalidDate { field: DateField::Departure, source: DateError::Missing }
        );
    }

    #[test]
    fn test_evaluate_reports_recorded_violations() {
        let engine = engine();
        assert_eq!(engine.evaluate(&valid()).unwrap(), engine.first_violation(&valid()).unwrap());

        let mut q = valid();
        q.return_date = Some("19/10/2025".into());
        let violations = engine.evaluate(&q).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::ReturnNotAfterDeparture {
                departure: NaiveDate::from_ymd_opt(2025, 10, 19).unwrap(),
                return_on: NaiveDate::from_ymd_opt(2025, 10, 19).unwrap(),
            }]
        );

        let mut q = valid();
        q.seating_class = None;
        q.departure_date = None;
        let codes: Vec<_> = engine.evaluate(&q).unwrap_err().iter().map(Violation::code).collect();
        assert_eq!(codes, vec!["UNKNOWN_SEATING_CLASS", "INVALID_DATE"]);
    }

    #[test]
    fn test_violation_messages() {
        let v = Violation::UnknownSeatingClass(None);
        assert_eq!(v.to_string(), "Unknown seating class: <none>");
        let v = Violation::PassengerTotal { total: 10 };
        assert_eq!(v.to_string(), "Passenger total must be between 1 and 9, got 10");
    }
}
