use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::greedy::GreedyAllocator;
use crate::domain::allocation::options::AllocatorOptions;
use crate::domain::allocation::policy::AllocationStrategy;
use crate::domain::capacity::capacity_schedule::CapacitySchedule;
use crate::domain::flight::demand::DemandProfile;
use crate::domain::flight::flight::Flight;

/// Regulates only the contiguous congested window.
///
/// The window runs from the first to the end of the last clock hour whose predicted
/// demand exceeds capacity. Flights of both classes desiring a time inside it go
/// through the greedy search; all other flights keep their desired time. The
/// pass-through flights are booked into the allocation state first, so a regulated
/// flight pushed past the window still counts them against capacity and separation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectiveStrategy;

impl AllocationStrategy for SelectiveStrategy {
    fn allocate(&self, flights: Vec<Flight>, schedule: &CapacitySchedule, options: &AllocatorOptions) -> Vec<AllocatedFlight> {
        let profile = DemandProfile::from_flights(&flights, schedule);

        let Some((window_start, window_end)) = profile.congested_window(options.capacity_mode) else {
            log::info!("No congested hour found, all {} flights pass through unregulated.", flights.len());
            return flights.into_iter().map(AllocatedFlight::passed_through).collect();
        };

        log::info!("Congested window {} to {}: regulating the flights desiring a time inside it.", window_start, window_end);

        let (to_regulate, to_pass): (Vec<Flight>, Vec<Flight>) =
            flights.into_iter().partition(|f| f.desired_time >= window_start && f.desired_time < window_end);

        let mut allocator = GreedyAllocator::new(schedule, options);
        for flight in &to_pass {
            allocator.occupy_fixed(flight, flight.desired_time);
        }

        let mut result: Vec<AllocatedFlight> = allocator.allocate_all(to_regulate);
        result.extend(to_pass.into_iter().map(AllocatedFlight::passed_through));

        result
    }
}
