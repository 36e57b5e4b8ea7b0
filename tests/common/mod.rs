#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use gdp_slot_allocator::api::scenario_dto::FlightDto;
use gdp_slot_allocator::domain::airport::AirportProfile;
use gdp_slot_allocator::domain::allocation::allocated_flight::AllocatedFlight;
use gdp_slot_allocator::domain::capacity::capacity_event::CapacityEvent;
use gdp_slot_allocator::domain::capacity::capacity_schedule::{CapacitySchedule, DefaultRates};
use gdp_slot_allocator::domain::flight::flight::{Flight, FlightClass};

pub const AIRPORT: &str = "VVTS";

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, h, m, 0).unwrap()
}

pub fn airport() -> AirportProfile {
    AirportProfile::new(AIRPORT, 7, 15).unwrap()
}

pub fn arrival(callsign: &str, time: DateTime<Utc>) -> Flight {
    Flight::new(callsign, "VVNB", AIRPORT, FlightClass::Arrival, time)
}

pub fn departure(callsign: &str, time: DateTime<Utc>) -> Flight {
    Flight::new(callsign, AIRPORT, "VVDN", FlightClass::Departure, time)
}

pub fn schedule(arrival_rate: i64, departure_rate: i64, min_separation_minutes: i64) -> CapacitySchedule {
    CapacitySchedule::with_defaults(DefaultRates::new(arrival_rate, departure_rate, min_separation_minutes).unwrap())
}

pub fn schedule_with_events(arrival_rate: i64, departure_rate: i64, min_separation_minutes: i64, events: Vec<CapacityEvent>) -> CapacitySchedule {
    CapacitySchedule::new(DefaultRates::new(arrival_rate, departure_rate, min_separation_minutes).unwrap(), events).unwrap()
}

/// A busy morning bank: `count` flights alternating arrival/departure, `spacing_minutes` apart from 07:00.
pub fn morning_bank(count: u32, spacing_minutes: u32) -> Vec<Flight> {
    (0..count)
        .map(|i| {
            let offset = i * spacing_minutes;
            let time = at(7 + offset / 60, offset % 60);
            if i % 2 == 0 { arrival(&format!("ARR{:03}", i), time) } else { departure(&format!("DEP{:03}", i), time) }
        })
        .collect()
}

pub fn records_of(flights: &[Flight]) -> Vec<FlightDto> {
    flights.iter().map(FlightDto::from).collect()
}

pub fn find<'a>(result: &'a [AllocatedFlight], callsign: &str) -> &'a AllocatedFlight {
    result.iter().find(|f| f.flight.callsign.as_str() == callsign).unwrap_or_else(|| panic!("flight {} missing from result", callsign))
}
