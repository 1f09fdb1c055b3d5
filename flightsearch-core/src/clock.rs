use chrono::{Local, NaiveDate};

/// Source of the reference calendar date that departures are measured against.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Current local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one day, for repeatable runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// 18 October 2025, the date the acceptance suite is written against.
    pub fn reference() -> Self {
        Self(NaiveDate::from_ymd_opt(2025, 10, 18).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::reference();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 10, 18).unwrap());

        let other = FixedClock(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(other.today(), NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    }

    #[test]
    fn test_system_clock_is_boxable() {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        // Only check that it yields a plausible date.
        assert!(clock.today() > NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }
}
