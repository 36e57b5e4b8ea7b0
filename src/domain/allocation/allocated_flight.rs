use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::flight::flight::Flight;
use crate::domain::utils::time::minutes_between;

/// How a flight left the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A slot was found by the search; the regulated time may equal the desired time.
    Allocated,
    /// The policy left the flight alone.
    PassedThrough,
    /// No slot inside the search window. The regulated time falls back to the desired time.
    Exhausted,
}

/// A flight together with the regulated event time the allocator gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedFlight {
    pub flight: Flight,
    pub regulated_time: DateTime<Utc>,
    pub outcome: AllocationOutcome,
}

impl AllocatedFlight {
    pub fn allocated(flight: Flight, regulated_time: DateTime<Utc>) -> Self {
        AllocatedFlight { flight, regulated_time, outcome: AllocationOutcome::Allocated }
    }

    pub fn passed_through(flight: Flight) -> Self {
        let regulated_time = flight.desired_time;
        AllocatedFlight { flight, regulated_time, outcome: AllocationOutcome::PassedThrough }
    }

    pub fn exhausted(flight: Flight) -> Self {
        let regulated_time = flight.desired_time;
        AllocatedFlight { flight, regulated_time, outcome: AllocationOutcome::Exhausted }
    }

    /// `regulated - desired`, clamped at zero.
    pub fn delay(&self) -> TimeDelta {
        (self.regulated_time - self.flight.desired_time).max(TimeDelta::zero())
    }

    pub fn delay_minutes(&self) -> f64 {
        minutes_between(self.flight.desired_time, self.regulated_time).max(0.0)
    }

    pub fn is_regulated(&self, epsilon_minutes: f64) -> bool {
        self.delay_minutes() > epsilon_minutes
    }

    pub fn is_scheduling_failure(&self) -> bool {
        self.outcome == AllocationOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::flight::FlightClass;
    use chrono::TimeZone;

    fn flight() -> Flight {
        Flight::new("VN220", "VVNB", "VVTS", FlightClass::Arrival, Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 30).unwrap())
    }

    #[test]
    fn test_delay_and_regulated_flag() {
        let f = flight();
        let desired = f.desired_time;

        let on_time = AllocatedFlight::allocated(f.clone(), desired + TimeDelta::seconds(6));
        assert_eq!(on_time.delay_minutes(), 0.1);
        assert!(!on_time.is_regulated(0.1), "a delay of exactly epsilon is not a regulation");

        let delayed = AllocatedFlight::allocated(f, desired + TimeDelta::seconds(30));
        assert_eq!(delayed.delay(), TimeDelta::seconds(30));
        assert!(delayed.is_regulated(0.1));
    }

    #[test]
    fn test_fallbacks_keep_desired_time() {
        let passed = AllocatedFlight::passed_through(flight());
        assert_eq!(passed.delay(), TimeDelta::zero());
        assert!(!passed.is_scheduling_failure());

        let exhausted = AllocatedFlight::exhausted(flight());
        assert_eq!(exhausted.regulated_time, exhausted.flight.desired_time);
        assert!(exhausted.is_scheduling_failure());
        assert!(!exhausted.is_regulated(0.1));
    }
}
