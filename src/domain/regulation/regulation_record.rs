use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::allocation::allocated_flight::AllocationOutcome;
use crate::domain::flight::flight::FlightClass;
use crate::domain::utils::id::{AirportCode, Callsign};

/// One regulated flight as handed to the presentation layer.
///
/// The base fields come from the allocation; everything else is derived by the
/// [`ResultFormatter`](crate::domain::regulation::result_formatter::ResultFormatter)
/// and can be recomputed from the base fields at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct RegulationRecord {
    pub callsign: Callsign,
    pub class: FlightClass,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub enroute_minutes: Option<i64>,
    pub outcome: AllocationOutcome,

    pub desired_utc: DateTime<Utc>,
    pub desired_local: DateTime<FixedOffset>,
    pub regulated_utc: DateTime<Utc>,
    pub regulated_local: DateTime<FixedOffset>,

    /// `regulated - desired` in minutes, never negative.
    pub delay_minutes: f64,
    pub regulated: bool,

    /// Calculated takeoff time at the origin. Only set for regulated flights.
    pub ctot_utc: Option<DateTime<Utc>>,
    pub ctot_local: Option<DateTime<FixedOffset>>,
    /// The CTOT of an arrival was derived without a known enroute time.
    pub ctot_approximate: bool,

    /// Event time after the compliance overlay; `None` until it ran.
    pub actual_utc: Option<DateTime<Utc>>,
}

impl RegulationRecord {
    pub fn is_scheduling_failure(&self) -> bool {
        self.outcome == AllocationOutcome::Exhausted
    }
}
