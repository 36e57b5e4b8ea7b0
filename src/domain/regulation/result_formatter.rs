use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::allocator::Allocation;
use crate::domain::flight::flight::FlightClass;
use crate::domain::regulation::regulation_record::RegulationRecord;
use crate::domain::utils::time::minutes_between;

/// Turns an allocation into [`RegulationRecord`]s: delay, regulated flag, CTOT and
/// local-time views at the fixed airport offset.
#[derive(Debug, Clone, Copy)]
pub struct ResultFormatter {
    utc_offset: FixedOffset,
    regulation_epsilon_minutes: f64,
}

impl ResultFormatter {
    pub fn new(utc_offset: FixedOffset, regulation_epsilon_minutes: f64) -> Self {
        ResultFormatter { utc_offset, regulation_epsilon_minutes }
    }

    pub fn format(&self, allocation: &Allocation) -> Vec<RegulationRecord> {
        allocation.flights.iter().map(|f| self.format_flight(f)).collect()
    }

    pub fn format_flight(&self, allocated: &AllocatedFlight) -> RegulationRecord {
        let flight = &allocated.flight;

        self.derive(RegulationRecord {
            callsign: flight.callsign.clone(),
            class: flight.class,
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            enroute_minutes: flight.enroute_minutes,
            outcome: allocated.outcome,
            desired_utc: flight.desired_time,
            desired_local: self.local(flight.desired_time),
            regulated_utc: allocated.regulated_time,
            regulated_local: self.local(allocated.regulated_time),
            delay_minutes: 0.0,
            regulated: false,
            ctot_utc: None,
            ctot_local: None,
            ctot_approximate: false,
            actual_utc: None,
        })
    }

    /// Recomputes every derived field from the base fields. Applying it to its own
    /// output changes nothing; an existing actual time is kept.
    pub fn reformat(&self, records: &[RegulationRecord]) -> Vec<RegulationRecord> {
        records.iter().cloned().map(|record| self.derive(record)).collect()
    }

    fn derive(&self, mut record: RegulationRecord) -> RegulationRecord {
        record.desired_local = self.local(record.desired_utc);
        record.regulated_local = self.local(record.regulated_utc);
        record.delay_minutes = minutes_between(record.desired_utc, record.regulated_utc).max(0.0);
        record.regulated = record.delay_minutes > self.regulation_epsilon_minutes;

        let (ctot, approximate) = match (record.regulated, record.class) {
            (false, _) => (None, false),
            (true, FlightClass::Departure) => (Some(record.regulated_utc), false),
            (true, FlightClass::Arrival) => {
                let ctot = record.enroute_minutes.and_then(TimeDelta::try_minutes).and_then(|enroute| record.regulated_utc.checked_sub_signed(enroute));

                match ctot {
                    Some(ctot) => (Some(ctot), false),
                    None => {
                        log::debug!("No usable enroute time for arrival {}; its CTOT equals the regulated landing time.", record.callsign);
                        (Some(record.regulated_utc), true)
                    }
                }
            }
        };

        record.ctot_utc = ctot;
        record.ctot_local = ctot.map(|t| self.local(t));
        record.ctot_approximate = approximate;

        record
    }

    fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.utc_offset)
    }
}
