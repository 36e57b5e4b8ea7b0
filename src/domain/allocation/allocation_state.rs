use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::Excluded;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::allocation::hour_slot::HourSlot;
use crate::domain::allocation::options::SeparationScope;
use crate::domain::capacity::capacity_schedule::CapacityMode;
use crate::domain::flight::flight::{Flight, FlightClass};
use crate::domain::utils::time::truncate_to_hour;

/// Which hourly counter a flight is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CounterClass {
    Arrival,
    Departure,
    Combined,
}

/// A time axis on which regulated times must keep the minimum separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Lane {
    Runway,
    Class(FlightClass),
}

/// Mutable bookkeeping of one allocation run: hourly loads per counter and the
/// committed times per separation lane. Created fresh for every run.
#[derive(Debug)]
pub struct AllocationState {
    capacity_mode: CapacityMode,
    separation_scope: SeparationScope,
    hours: HashMap<(DateTime<Utc>, CounterClass), HourSlot>,
    /// Committed times per lane, as a multiset (time -> number of flights at that time).
    lanes: HashMap<Lane, BTreeMap<DateTime<Utc>, u32>>,
}

impl AllocationState {
    pub fn new(capacity_mode: CapacityMode, separation_scope: SeparationScope) -> Self {
        AllocationState { capacity_mode, separation_scope, hours: HashMap::new(), lanes: HashMap::new() }
    }

    fn counter_for(&self, class: FlightClass) -> CounterClass {
        match (self.capacity_mode, class) {
            (CapacityMode::Combined, _) => CounterClass::Combined,
            (CapacityMode::PerClass, FlightClass::Arrival) => CounterClass::Arrival,
            (CapacityMode::PerClass, FlightClass::Departure) => CounterClass::Departure,
        }
    }

    fn lane_for(&self, class: FlightClass) -> Lane {
        match self.separation_scope {
            SeparationScope::Runway => Lane::Runway,
            SeparationScope::PerClass => Lane::Class(class),
        }
    }

    /// Whether the clock hour containing `instant` can take one more flight of `class`.
    pub fn has_capacity(&self, class: FlightClass, instant: DateTime<Utc>, capacity: u32) -> bool {
        match self.hours.get(&(truncate_to_hour(instant), self.counter_for(class))) {
            Some(slot) => slot.has_room(capacity),
            None => capacity > 0,
        }
    }

    /// `true` when no committed time in the flight's lane lies strictly closer than `separation` to `candidate`.
    pub fn is_separated(&self, class: FlightClass, candidate: DateTime<Utc>, separation: TimeDelta) -> bool {
        if separation <= TimeDelta::zero() {
            return true;
        }

        match self.lanes.get(&self.lane_for(class)) {
            Some(times) => times.range((Excluded(candidate - separation), Excluded(candidate + separation))).next().is_none(),
            None => true,
        }
    }

    /// Records `flight` at `instant` in its hour counter and its separation lane.
    ///
    /// Capacity and separation are not checked here; callers that pin flights to a
    /// fixed time (pass-through flights) rely on that.
    ///
    /// # Returns
    /// `false` if the callsign was already booked into that hour.
    pub fn commit(&mut self, flight: &Flight, instant: DateTime<Utc>) -> bool {
        let key = (truncate_to_hour(instant), self.counter_for(flight.class));

        if !self.hours.entry(key).or_default().insert_flight(&flight.callsign) {
            return false;
        }

        let lane = self.lane_for(flight.class);
        *self.lanes.entry(lane).or_default().entry(instant).or_insert(0) += 1;

        true
    }

    /// Number of flights charged to the counter of `class` in the hour starting at `hour`.
    pub fn hour_load(&self, class: FlightClass, hour: DateTime<Utc>) -> u32 {
        self.hours.get(&(truncate_to_hour(hour), self.counter_for(class))).map_or(0, |slot| slot.load)
    }
}
