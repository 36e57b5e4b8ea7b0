use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::allocation::allocated_flight::AllocatedFlight;
use crate::domain::allocation::allocation_state::AllocationState;
use crate::domain::allocation::options::{AllocatorOptions, SeparationScope};
use crate::domain::allocation::policy::AllocationStrategy;
use crate::domain::capacity::capacity_schedule::{CapacityMode, CapacitySchedule, EffectiveRates};
use crate::domain::flight::demand::DemandProfile;
use crate::domain::flight::flight::{Flight, FlightClass};
use crate::domain::utils::time::next_hour;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Arrivals first, departures against what the arrivals left over.
///
/// **Arrival pass**: arrivals desiring a time inside the arrival congested window get
/// slots from a cursor that starts at the window start and advances by
/// `60 / arrival_rate` minutes (at least the minimum separation) after every slot.
///
/// **Departure pass**: the departure capacity of an hour is
/// `max(floor_fraction * departure_rate, total_rate - regulated arrivals in that hour)`.
/// From the first hour whose departure demand exceeds that capacity, every later
/// departure is placed with the same cursor technique.
///
/// The hourly capacity is only approximated through the slot interval; flights passed
/// through are not re-checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualPassStrategy;

impl AllocationStrategy for DualPassStrategy {
    fn allocate(&self, flights: Vec<Flight>, schedule: &CapacitySchedule, options: &AllocatorOptions) -> Vec<AllocatedFlight> {
        let (arrivals, departures): (Vec<Flight>, Vec<Flight>) = flights.into_iter().partition(Flight::is_arrival);

        // Both passes count per class, whatever capacity mode the run was configured with.
        let mut state = AllocationState::new(CapacityMode::PerClass, SeparationScope::PerClass);

        let mut result = regulate_arrivals(arrivals, schedule, options, &mut state);
        result.extend(regulate_departures(departures, schedule, options, &mut state));

        result
    }
}

/// Slot rate in force at one instant for one pass.
struct SlotRate {
    per_hour: f64,
    min_separation: TimeDelta,
    valid_until: Option<DateTime<Utc>>,
}

impl SlotRate {
    fn from_rates(rates: &EffectiveRates, per_hour: f64) -> Self {
        SlotRate { per_hour, min_separation: rates.min_separation(), valid_until: rates.valid_until() }
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::milliseconds((MILLIS_PER_HOUR / self.per_hour).round() as i64).max(self.min_separation)
    }
}

/// Monotonic slot cursor: every slot handed out is at or after the previous slot plus one interval.
struct SlotCursor {
    next: DateTime<Utc>,
    max_search: Option<TimeDelta>,
}

impl SlotCursor {
    fn new(start: DateTime<Utc>, max_search_minutes: i64) -> Self {
        SlotCursor { next: start, max_search: TimeDelta::try_minutes(max_search_minutes) }
    }

    fn place(&mut self, desired: DateTime<Utc>, rate_at: impl Fn(DateTime<Utc>) -> SlotRate) -> Option<DateTime<Utc>> {
        let limit = self.max_search.and_then(|window| desired.checked_add_signed(window)).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut candidate = self.next.max(desired);

        while candidate <= limit {
            let rate = rate_at(candidate);

            if rate.per_hour <= 0.0 {
                let hour_end = next_hour(candidate);
                candidate = rate.valid_until.map_or(hour_end, |until| until.min(hour_end)).max(candidate + TimeDelta::minutes(1));
                continue;
            }

            self.next = candidate + rate.interval();
            return Some(candidate);
        }

        None
    }
}

fn regulate_arrivals(arrivals: Vec<Flight>, schedule: &CapacitySchedule, options: &AllocatorOptions, state: &mut AllocationState) -> Vec<AllocatedFlight> {
    let profile = DemandProfile::from_flights(&arrivals, schedule);

    let Some((window_start, window_end)) = profile.congested_window_for(FlightClass::Arrival) else {
        log::info!("Arrival flow is clear, {} arrivals pass through.", arrivals.len());
        return pass_through(arrivals, state);
    };

    log::info!("Arrival pass: regulating arrivals between {} and {}.", window_start, window_end);

    let (to_regulate, to_pass): (Vec<Flight>, Vec<Flight>) =
        arrivals.into_iter().partition(|f| f.desired_time >= window_start && f.desired_time < window_end);

    let mut cursor = SlotCursor::new(window_start, options.max_search_minutes);
    let mut result = Vec::with_capacity(to_regulate.len() + to_pass.len());

    for flight in sorted(to_regulate) {
        let slot = cursor.place(flight.desired_time, |instant| {
            let rates = schedule.effective_rates(instant);
            SlotRate::from_rates(&rates, rates.arrival_rate as f64)
        });

        result.push(commit_or_exhaust(flight, slot, state));
    }

    result.extend(pass_through(to_pass, state));
    result
}

fn regulate_departures(
    departures: Vec<Flight>,
    schedule: &CapacitySchedule,
    options: &AllocatorOptions,
    state: &mut AllocationState,
) -> Vec<AllocatedFlight> {
    let residual_capacity = |state: &AllocationState, instant: DateTime<Utc>| -> (EffectiveRates, f64) {
        let rates = schedule.effective_rates(instant);
        let floor = options.departure_floor_fraction * rates.departure_rate as f64;
        let residual = rates.total_rate as f64 - state.hour_load(FlightClass::Arrival, instant) as f64;
        (rates, floor.max(residual))
    };

    let profile = DemandProfile::from_flights(&departures, schedule);
    let first_congested = profile.hours().iter().find(|h| h.departures as f64 > residual_capacity(state, h.hour).1).map(|h| h.hour);

    let Some(regulation_start) = first_congested else {
        log::info!("Departure flow is clear, {} departures pass through.", departures.len());
        return pass_through(departures, state);
    };

    log::info!("Departure pass: regulating departures from {}.", regulation_start);

    let (to_regulate, to_pass): (Vec<Flight>, Vec<Flight>) = departures.into_iter().partition(|f| f.desired_time >= regulation_start);

    let mut cursor = SlotCursor::new(regulation_start, options.max_search_minutes);
    let mut result = Vec::with_capacity(to_regulate.len() + to_pass.len());

    for flight in sorted(to_regulate) {
        let slot = cursor.place(flight.desired_time, |instant| {
            let (rates, capacity) = residual_capacity(state, instant);
            SlotRate::from_rates(&rates, capacity)
        });

        result.push(commit_or_exhaust(flight, slot, state));
    }

    result.extend(pass_through(to_pass, state));
    result
}

fn sorted(mut flights: Vec<Flight>) -> Vec<Flight> {
    flights.sort_by(|a, b| a.desired_time.cmp(&b.desired_time).then_with(|| a.callsign.cmp(&b.callsign)));
    flights
}

fn commit_or_exhaust(flight: Flight, slot: Option<DateTime<Utc>>, state: &mut AllocationState) -> AllocatedFlight {
    match slot {
        Some(slot) => {
            state.commit(&flight, slot);
            AllocatedFlight::allocated(flight, slot)
        }
        None => AllocatedFlight::exhausted(flight),
    }
}

fn pass_through(flights: Vec<Flight>, state: &mut AllocationState) -> Vec<AllocatedFlight> {
    flights
        .into_iter()
        .map(|flight| {
            state.commit(&flight, flight.desired_time);
            AllocatedFlight::passed_through(flight)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::allocated_flight::AllocationOutcome;
    use crate::domain::capacity::capacity_event::CapacityEvent;
    use crate::domain::capacity::capacity_schedule::DefaultRates;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, m, 0).unwrap()
    }

    fn arrival(callsign: &str, time: DateTime<Utc>) -> Flight {
        Flight::new(callsign, "VVNB", "VVTS", FlightClass::Arrival, time)
    }

    fn departure(callsign: &str, time: DateTime<Utc>) -> Flight {
        Flight::new(callsign, "VVTS", "VVDN", FlightClass::Departure, time)
    }

    fn find<'a>(result: &'a [AllocatedFlight], callsign: &str) -> &'a AllocatedFlight {
        result.iter().find(|f| f.flight.callsign.as_str() == callsign).unwrap()
    }

    #[test]
    fn test_arrivals_spaced_by_slot_interval() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(4, 10, 2).unwrap());
        let flights = (0..6).map(|i| arrival(&format!("A{}", i), at(8, i))).collect();

        let result = DualPassStrategy.allocate(flights, &schedule, &AllocatorOptions::default());

        let times: Vec<DateTime<Utc>> = (0..6).map(|i| find(&result, &format!("A{}", i)).regulated_time).collect();
        assert_eq!(times, vec![at(8, 0), at(8, 15), at(8, 30), at(8, 45), at(9, 0), at(9, 15)]);
    }

    #[test]
    fn test_arrivals_outside_window_pass_through() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(1, 10, 2).unwrap());
        let flights = vec![arrival("EARLY", at(6, 30)), arrival("A1", at(8, 0)), arrival("A2", at(8, 5))];

        let result = DualPassStrategy.allocate(flights, &schedule, &AllocatorOptions::default());

        assert_eq!(find(&result, "EARLY").outcome, AllocationOutcome::PassedThrough);
        assert_eq!(find(&result, "A1").regulated_time, at(8, 0));
        assert_eq!(find(&result, "A2").regulated_time, at(9, 0));
    }

    #[test]
    fn test_departures_use_residual_capacity() {
        // Total 4 per hour; two arrivals at 08 leave room for two departures, so the third waits.
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(2, 2, 1).unwrap());
        let flights = vec![
            arrival("A1", at(8, 0)),
            arrival("A2", at(8, 30)),
            departure("D1", at(8, 0)),
            departure("D2", at(8, 1)),
            departure("D3", at(8, 2)),
        ];

        let result = DualPassStrategy.allocate(flights, &schedule, &AllocatorOptions::default());

        assert_eq!(find(&result, "A1").outcome, AllocationOutcome::PassedThrough);
        assert_eq!(find(&result, "D1").regulated_time, at(8, 0));
        assert_eq!(find(&result, "D2").regulated_time, at(8, 30));
        assert_eq!(find(&result, "D3").regulated_time, at(9, 0));
    }

    #[test]
    fn test_departure_floor_is_configurable() {
        // Arrivals use up the whole combined budget at 08; departures only keep the floor.
        let single_runway = CapacityEvent::new("single-runway", at(6, 0), at(12, 0)).with_total_rate(8);
        let schedule = CapacitySchedule::new(DefaultRates::new(8, 4, 1).unwrap(), vec![single_runway]).unwrap();

        let mut flights: Vec<Flight> = (0..12).map(|i| arrival(&format!("A{:02}", i), at(8, i * 5))).collect();
        flights.extend(["D1", "D2", "D3"].iter().map(|callsign| departure(callsign, at(8, 0))));

        let quarter = DualPassStrategy.allocate(flights.clone(), &schedule, &AllocatorOptions::default());
        let half = DualPassStrategy.allocate(flights, &schedule, &AllocatorOptions::default().with_departure_floor_fraction(0.5));

        // A quarter of the departure rate is one departure per hour, half of it two.
        assert_eq!(find(&quarter, "D1").regulated_time, at(8, 0));
        assert_eq!(find(&quarter, "D2").regulated_time, at(9, 0));
        assert_eq!(find(&half, "D2").regulated_time, at(8, 30));
        assert_eq!(find(&half, "D3").regulated_time, at(9, 0));
    }
}
