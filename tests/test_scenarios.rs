mod common;

use common::{arrival, at, find, schedule, schedule_with_events};
use gdp_slot_allocator::domain::allocation::allocated_flight::AllocationOutcome;
use gdp_slot_allocator::domain::allocation::allocator::SlotAllocator;
use gdp_slot_allocator::domain::allocation::options::AllocatorOptions;
use gdp_slot_allocator::domain::capacity::capacity_event::CapacityEvent;
use gdp_slot_allocator::domain::utils::time::truncate_to_hour;

#[test]
fn test_single_flight_is_not_regulated() {
    let schedule = schedule(1, 1, 2);
    let options = AllocatorOptions::default();

    let allocation = SlotAllocator::new(&schedule, options.clone()).allocate(vec![arrival("VN220", at(8, 25))]);
    let flight = &allocation.flights[0];

    assert_eq!(flight.regulated_time, at(8, 25), "a lone flight must keep its desired time");
    assert_eq!(flight.delay_minutes(), 0.0);
    assert!(!flight.is_regulated(options.regulation_epsilon_minutes));
}

#[test]
fn test_full_hour_pushes_second_arrival_to_next_hour() {
    let schedule = schedule(1, 1, 2);

    let allocation = SlotAllocator::new(&schedule, AllocatorOptions::default()).allocate(vec![arrival("VN222", at(8, 0)), arrival("VN221", at(8, 0))]);

    assert_eq!(find(&allocation.flights, "VN221").regulated_time, at(8, 0));
    assert_eq!(
        find(&allocation.flights, "VN222").regulated_time,
        at(9, 0),
        "the hour is the unit of capacity exhaustion, not the separation"
    );
}

#[test]
fn test_zero_rate_event_keeps_arrivals_out_of_its_interval() {
    let closure = CapacityEvent::new("thunderstorm", at(9, 0), at(10, 0)).with_arrival_rate(0);
    let schedule = schedule_with_events(2, 2, 2, vec![closure]);

    let flights = vec![arrival("A1", at(8, 50)), arrival("A2", at(8, 55)), arrival("A3", at(9, 0)), arrival("A4", at(9, 30)), arrival("A5", at(9, 59))];
    let allocation = SlotAllocator::new(&schedule, AllocatorOptions::default()).allocate(flights);

    for flight in &allocation.flights {
        assert!(
            flight.regulated_time < at(9, 0) || flight.regulated_time >= at(10, 0),
            "{} regulated into the closed interval at {}",
            flight.flight.callsign,
            flight.regulated_time
        );
    }

    for callsign in ["A3", "A4", "A5"] {
        assert!(find(&allocation.flights, callsign).regulated_time >= at(10, 0));
    }
    assert_eq!(find(&allocation.flights, "A3").regulated_time, at(10, 0));
    assert_eq!(find(&allocation.flights, "A4").regulated_time, at(10, 2), "separated from A3 inside the reopened hour");
    assert_eq!(truncate_to_hour(find(&allocation.flights, "A5").regulated_time), at(11, 0));
}

#[test]
fn test_exhausted_search_falls_back_and_is_reported() {
    let closure = CapacityEvent::new("runway-closure", at(6, 0), at(20, 0)).with_arrival_rate(0);
    let schedule = schedule_with_events(10, 10, 2, vec![closure]);

    let allocation = SlotAllocator::new(&schedule, AllocatorOptions::default()).allocate(vec![arrival("VN220", at(7, 0)), arrival("VN221", at(19, 30))]);

    let stuck = find(&allocation.flights, "VN220");
    assert_eq!(stuck.outcome, AllocationOutcome::Exhausted);
    assert_eq!(stuck.regulated_time, at(7, 0), "fallback is the desired time");
    assert!(stuck.is_scheduling_failure());

    let late = find(&allocation.flights, "VN221");
    assert_eq!(late.outcome, AllocationOutcome::Allocated);
    assert_eq!(late.regulated_time, at(20, 0));

    assert_eq!(allocation.exhausted.len(), 1);
    assert_eq!(allocation.exhausted[0].as_str(), "VN220");
    assert_eq!(allocation.flights.len(), 2, "exhausted flights are not dropped");
}
