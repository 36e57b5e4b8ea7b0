use crate::domain::flight::flight::FlightClass;
use crate::domain::regulation::regulation_record::RegulationRecord;

/// Aggregate figures of one regulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegulationSummary {
    pub flights: usize,
    pub arrivals: usize,
    pub departures: usize,
    pub regulated: usize,
    pub exhausted: usize,
    pub total_delay_minutes: f64,
    /// Average over the regulated flights only; `0.0` if none was regulated.
    pub average_delay_minutes: f64,
    pub max_delay_minutes: f64,
}

impl RegulationSummary {
    pub fn from_records(records: &[RegulationRecord]) -> Self {
        let mut summary = RegulationSummary { flights: records.len(), ..Default::default() };

        for record in records {
            match record.class {
                FlightClass::Arrival => summary.arrivals += 1,
                FlightClass::Departure => summary.departures += 1,
            }

            if record.is_scheduling_failure() {
                summary.exhausted += 1;
            }

            if record.regulated {
                summary.regulated += 1;
                summary.total_delay_minutes += record.delay_minutes;
                summary.max_delay_minutes = summary.max_delay_minutes.max(record.delay_minutes);
            }
        }

        if summary.regulated > 0 {
            summary.average_delay_minutes = summary.total_delay_minutes / summary.regulated as f64;
        }

        summary
    }
}
