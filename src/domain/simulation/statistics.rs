use uuid::Uuid;

use crate::domain::allocation::policy::AllocationPolicy;
use crate::domain::regulation::summary::RegulationSummary;

/// Target of the structured per-run records, so a subscriber can route them apart from the diagnostic log.
pub const ANALYTICS_TARGET: &str = "gdp_analytics";

pub fn log_run_summary(run_id: Uuid, policy: AllocationPolicy, summary: &RegulationSummary, rejected: usize) {
    tracing::info!(
        target: ANALYTICS_TARGET,
        RunId = %run_id,
        Policy = %policy,
        Flights = summary.flights,
        Arrivals = summary.arrivals,
        Departures = summary.departures,
        Regulated = summary.regulated,
        TotalDelayMinutes = summary.total_delay_minutes,
        AverageDelayMinutes = summary.average_delay_minutes,
        MaxDelayMinutes = summary.max_delay_minutes,
        Exhausted = summary.exhausted,
        Rejected = rejected,
    );

    if summary.exhausted > 0 {
        tracing::warn!(
            target: ANALYTICS_TARGET,
            RunId = %run_id,
            Exhausted = summary.exhausted,
            LogDescription = "Run finished with flights outside the search window",
        );
    }
}
