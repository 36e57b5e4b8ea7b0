use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::options::AllocatorOptions;
use crate::domain::allocation::policy::AllocationPolicy;
use crate::domain::capacity::capacity_schedule::CapacitySchedule;
use crate::domain::flight::flight::Flight;
use crate::domain::utils::id::Callsign;

/// Result of one allocation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub policy: AllocationPolicy,
    /// One entry per input flight, ordered by `(desired_time, callsign)`.
    pub flights: Vec<AllocatedFlight>,
    /// Flights whose search window ran out. They are also present in `flights`.
    pub exhausted: Vec<Callsign>,
}

/// Entry point of the allocation engine: dispatches to the configured policy and
/// normalizes its output.
#[derive(Debug)]
pub struct SlotAllocator<'a> {
    schedule: &'a CapacitySchedule,
    options: AllocatorOptions,
}

impl<'a> SlotAllocator<'a> {
    pub fn new(schedule: &'a CapacitySchedule, options: AllocatorOptions) -> Self {
        SlotAllocator { schedule, options }
    }

    pub fn options(&self) -> &AllocatorOptions {
        &self.options
    }

    pub fn allocate(&self, mut flights: Vec<Flight>) -> Allocation {
        let flight_count = flights.len();
        flights.sort_by(|a, b| a.desired_time.cmp(&b.desired_time).then_with(|| a.callsign.cmp(&b.callsign)));

        log::debug!("Allocating {} flights with the {} policy.", flight_count, self.options.policy);

        let strategy = self.options.policy.get_instance();
        let mut allocated = strategy.allocate(flights, self.schedule, &self.options);

        if allocated.len() != flight_count {
            log::error!("{:?} returned {} flights for {} inputs.", strategy, allocated.len(), flight_count);
        }

        allocated.sort_by(|a, b| {
            a.flight.desired_time.cmp(&b.flight.desired_time).then_with(|| a.flight.callsign.cmp(&b.flight.callsign))
        });

        let exhausted: Vec<Callsign> = allocated.iter().filter(|f| f.is_scheduling_failure()).map(|f| f.flight.callsign.clone()).collect();

        if !exhausted.is_empty() {
            let names: Vec<&str> = exhausted.iter().map(|c| c.as_str()).collect();
            log::warn!(
                "{} flight(s) found no slot within {} minutes and keep their desired time: {}",
                exhausted.len(),
                self.options.max_search_minutes,
                names.join(", ")
            );
        }

        Allocation { policy: self.options.policy, flights: allocated, exhausted }
    }
}
