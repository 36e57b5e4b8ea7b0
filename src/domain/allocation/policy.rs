use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::dual_pass::DualPassStrategy;
use crate::domain::allocation::greedy::SimpleGreedyStrategy;
use crate::domain::allocation::options::AllocatorOptions;
use crate::domain::allocation::selective::SelectiveStrategy;
use crate::domain::capacity::capacity_schedule::CapacitySchedule;
use crate::domain::flight::flight::Flight;
use crate::error::ConversionError;

/// The regulation policies the allocator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    /// **Simple greedy**: every flight goes through the time-stepping search.
    /// Strict capacity and separation guarantees.
    #[default]
    Simple,
    /// **Selective**: only flights inside the contiguous congested window are regulated,
    /// every other flight keeps its desired time.
    Selective,
    /// **Dual pass**: arrivals are regulated first on a fixed slot interval, departures
    /// afterwards against the capacity the arrivals left over.
    DualPass,
}

impl FromStr for AllocationPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Simple" | "simple" => Ok(AllocationPolicy::Simple),
            "Selective" | "selective" => Ok(AllocationPolicy::Selective),
            "DualPass" | "dual-pass" | "dual_pass" => Ok(AllocationPolicy::DualPass),
            _ => Err(ConversionError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::Simple => write!(f, "simple"),
            AllocationPolicy::Selective => write!(f, "selective"),
            AllocationPolicy::DualPass => write!(f, "dual-pass"),
        }
    }
}

impl AllocationPolicy {
    /// Factory method returning the concrete strategy behind the policy.
    pub fn get_instance(&self) -> Box<dyn AllocationStrategy> {
        match self {
            AllocationPolicy::Simple => Box::new(SimpleGreedyStrategy),
            AllocationPolicy::Selective => Box::new(SelectiveStrategy),
            AllocationPolicy::DualPass => Box::new(DualPassStrategy),
        }
    }
}

/// One way of turning a flight list into regulated times.
///
/// Implementations receive the flights already sorted by `(desired_time, callsign)`
/// and must return exactly one [`AllocatedFlight`] per input flight.
pub trait AllocationStrategy: Debug + Send + Sync {
    fn allocate(&self, flights: Vec<Flight>, schedule: &CapacitySchedule, options: &AllocatorOptions) -> Vec<AllocatedFlight>;
}
