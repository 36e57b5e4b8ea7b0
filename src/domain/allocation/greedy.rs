use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::allocation_state::AllocationState;
use crate::domain::allocation::options::AllocatorOptions;
use crate::domain::allocation::policy::AllocationStrategy;
use crate::domain::capacity::capacity_schedule::CapacitySchedule;
use crate::domain::flight::flight::Flight;
use crate::domain::utils::time::{ceil_to_minute, next_hour};

/// Time-stepping greedy search shared by the simple and the selective policy.
///
/// Flights are placed one after another and never moved again. For each flight
/// the candidate starts at its desired time rounded up to the whole minute and
/// moves forward:
/// - to the next clock hour (or the end of the governing capacity event, if that
///   comes first) while the candidate's hour is full for the flight's counter,
/// - by one minute while the candidate is too close to an already committed time.
///
/// A flight whose candidate passes `desired + max_search_minutes` is returned as
/// [`AllocatedFlight::exhausted`] and keeps its desired time.
#[derive(Debug)]
pub struct GreedyAllocator<'a> {
    schedule: &'a CapacitySchedule,
    options: &'a AllocatorOptions,
    state: AllocationState,
}

impl<'a> GreedyAllocator<'a> {
    pub fn new(schedule: &'a CapacitySchedule, options: &'a AllocatorOptions) -> Self {
        GreedyAllocator { schedule, options, state: AllocationState::new(options.capacity_mode, options.separation_scope) }
    }

    /// Books a flight at a fixed time without searching. Later flights have to respect it.
    pub fn occupy_fixed(&mut self, flight: &Flight, instant: DateTime<Utc>) {
        if !self.state.commit(flight, instant) {
            log::debug!("Flight {} was already present in the allocation state.", flight.callsign);
        }
    }

    pub fn allocate_flight(&mut self, flight: Flight) -> AllocatedFlight {
        match self.find_slot(&flight) {
            Some(slot) => {
                self.state.commit(&flight, slot);
                AllocatedFlight::allocated(flight, slot)
            }
            None => {
                log::debug!("No slot found for flight {} within {} minutes of {}.", flight.callsign, self.options.max_search_minutes, flight.desired_time);
                AllocatedFlight::exhausted(flight)
            }
        }
    }

    /// Allocates the flights in `(desired_time, callsign)` order.
    pub fn allocate_all(&mut self, mut flights: Vec<Flight>) -> Vec<AllocatedFlight> {
        flights.sort_by(|a, b| a.desired_time.cmp(&b.desired_time).then_with(|| a.callsign.cmp(&b.callsign)));
        flights.into_iter().map(|flight| self.allocate_flight(flight)).collect()
    }

    fn find_slot(&self, flight: &Flight) -> Option<DateTime<Utc>> {
        let start = ceil_to_minute(flight.desired_time);
        let limit = TimeDelta::try_minutes(self.options.max_search_minutes)
            .and_then(|window| start.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut candidate = start;

        while candidate <= limit {
            let rates = self.schedule.effective_rates(candidate);
            let capacity = rates.capacity_for(flight.class, self.options.capacity_mode);

            if !self.state.has_capacity(flight.class, candidate, capacity) {
                // The whole hour is saturated (or closed); never scan it minute by minute.
                let hour_end = next_hour(candidate);
                candidate = rates.valid_until().map_or(hour_end, |until| until.min(hour_end));
                continue;
            }

            if self.state.is_separated(flight.class, candidate, rates.min_separation()) {
                return Some(candidate);
            }

            candidate += TimeDelta::minutes(1);
        }

        None
    }
}

/// Every flight goes through the greedy search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleGreedyStrategy;

impl AllocationStrategy for SimpleGreedyStrategy {
    fn allocate(&self, flights: Vec<Flight>, schedule: &CapacitySchedule, options: &AllocatorOptions) -> Vec<AllocatedFlight> {
        GreedyAllocator::new(schedule, options).allocate_all(flights)
    }
}
