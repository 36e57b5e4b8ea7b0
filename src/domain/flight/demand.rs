use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeMap;

use crate::domain::capacity::capacity_schedule::{CapacityMode, CapacitySchedule};
use crate::domain::flight::flight::{Flight, FlightClass};
use crate::domain::utils::time::truncate_to_hour;

/// Predicted demand for one clock hour next to the capacity in force at its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyDemand {
    pub hour: DateTime<Utc>,
    pub arrivals: u32,
    pub departures: u32,
    pub arrival_capacity: u32,
    pub departure_capacity: u32,
    pub total_capacity: u32,
}

impl HourlyDemand {
    pub fn demand_for(&self, class: FlightClass) -> u32 {
        match class {
            FlightClass::Arrival => self.arrivals,
            FlightClass::Departure => self.departures,
        }
    }

    pub fn capacity_for(&self, class: FlightClass) -> u32 {
        match class {
            FlightClass::Arrival => self.arrival_capacity,
            FlightClass::Departure => self.departure_capacity,
        }
    }

    pub fn is_hotspot(&self, class: FlightClass) -> bool {
        self.demand_for(class) > self.capacity_for(class)
    }

    pub fn is_congested(&self, mode: CapacityMode) -> bool {
        match mode {
            CapacityMode::PerClass => self.is_hotspot(FlightClass::Arrival) || self.is_hotspot(FlightClass::Departure),
            CapacityMode::Combined => self.arrivals + self.departures > self.total_capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryLevel {
    Normal,
    Warning,
}

/// Human-readable outcome of the demand analysis for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    pub title: String,
    pub body: String,
}

/// Hour-by-hour demand over the contiguous span from the first to the last
/// desired hour. Hours without flights are present with zero demand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DemandProfile {
    hours: Vec<HourlyDemand>,
}

impl DemandProfile {
    pub fn from_flights<'a>(flights: impl IntoIterator<Item = &'a Flight>, schedule: &CapacitySchedule) -> Self {
        Self::from_events(flights.into_iter().map(|f| (f.class, f.desired_time)), schedule)
    }

    /// Builds the profile from `(class, event time)` pairs, e.g. already regulated times.
    pub fn from_events(events: impl IntoIterator<Item = (FlightClass, DateTime<Utc>)>, schedule: &CapacitySchedule) -> Self {
        let mut counts: BTreeMap<DateTime<Utc>, (u32, u32)> = BTreeMap::new();

        for (class, time) in events {
            let entry = counts.entry(truncate_to_hour(time)).or_insert((0, 0));
            match class {
                FlightClass::Arrival => entry.0 += 1,
                FlightClass::Departure => entry.1 += 1,
            }
        }

        let (first, last) = match (counts.keys().next(), counts.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return DemandProfile::default(),
        };

        let mut hours = Vec::new();
        let mut hour = first;

        while hour <= last {
            let (arrivals, departures) = counts.get(&hour).copied().unwrap_or((0, 0));
            let rates = schedule.effective_rates(hour);

            hours.push(HourlyDemand {
                hour,
                arrivals,
                departures,
                arrival_capacity: rates.arrival_rate,
                departure_capacity: rates.departure_rate,
                total_capacity: rates.total_rate,
            });

            hour += TimeDelta::hours(1);
        }

        DemandProfile { hours }
    }

    pub fn hours(&self) -> &[HourlyDemand] {
        &self.hours
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn hotspots(&self, class: FlightClass) -> Vec<&HourlyDemand> {
        self.hours.iter().filter(|h| h.is_hotspot(class)).collect()
    }

    /// `[first congested hour, last congested hour + 1h)`, or `None` when demand fits everywhere.
    pub fn congested_window(&self, mode: CapacityMode) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Self::window(self.hours.iter().filter(|h| h.is_congested(mode)))
    }

    /// Same as [`congested_window`](Self::congested_window) but only judging one class.
    pub fn congested_window_for(&self, class: FlightClass) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Self::window(self.hours.iter().filter(|h| h.is_hotspot(class)))
    }

    fn window<'a>(mut congested: impl Iterator<Item = &'a HourlyDemand>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = congested.next()?.hour;
        let last = congested.last().map(|h| h.hour).unwrap_or(first);
        Some((first, last + TimeDelta::hours(1)))
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        let arrival_hotspots = self.hotspots(FlightClass::Arrival).len();
        if arrival_hotspots > 0 {
            advisories.push(Advisory {
                level: AdvisoryLevel::Warning,
                title: "Arrival flow overload".to_string(),
                body: format!("{} hour(s) with landing demand above capacity. A ground delay program is recommended.", arrival_hotspots),
            });
        }

        let departure_hotspots = self.hotspots(FlightClass::Departure).len();
        if departure_hotspots > 0 {
            advisories.push(Advisory {
                level: AdvisoryLevel::Warning,
                title: "Departure flow overload".to_string(),
                body: format!("{} hour(s) with takeoff demand above capacity. Departure regulation is recommended.", departure_hotspots),
            });
        }

        if advisories.is_empty() {
            advisories.push(Advisory {
                level: AdvisoryLevel::Normal,
                title: "Normal operations".to_string(),
                body: "Predicted demand stays within capacity for every hour.".to_string(),
            });
        }

        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_empty_profile() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(2, 2, 2).unwrap());
        let profile = DemandProfile::from_flights(&Vec::<Flight>::new(), &schedule);

        assert!(profile.is_empty());
        assert_eq!(profile.congested_window(CapacityMode::PerClass), None);
        assert_eq!(profile.advisories()[0].level, AdvisoryLevel::Normal);
    }

    #[test]
    fn test_gap_hours_are_filled() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(2, 2, 2).unwrap());
        let flights = vec![arrival("A1", at(8, 10)), departure("D1", at(11, 5))];
        let profile = DemandProfile::from_flights(&flights, &schedule);

        let hours: Vec<DateTime<Utc>> = profile.hours().iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![at(8, 0), at(9, 0), at(10, 0), at(11, 0)]);
        assert_eq!(profile.hours()[1].arrivals + profile.hours()[1].departures, 0);
    }

    #[test]
    fn test_congested_window_spans_first_to_last_hotspot() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(1, 5, 2).unwrap());
        let flights = vec![
            arrival("A1", at(8, 0)),
            arrival("A2", at(8, 30)),
            arrival("A3", at(9, 0)),
            arrival("A4", at(10, 0)),
            arrival("A5", at(10, 20)),
            arrival("A6", at(12, 0)),
        ];
        let profile = DemandProfile::from_flights(&flights, &schedule);

        assert_eq!(profile.hotspots(FlightClass::Arrival).len(), 2);
        assert_eq!(profile.congested_window(CapacityMode::PerClass), Some((at(8, 0), at(11, 0))));
        assert_eq!(profile.congested_window_for(FlightClass::Departure), None);
        assert_eq!(profile.advisories().len(), 1);
        assert_eq!(profile.advisories()[0].level, AdvisoryLevel::Warning);
    }

    #[test]
    fn test_combined_mode_counts_both_classes() {
        let schedule = CapacitySchedule::with_defaults(DefaultRates::new(2, 2, 2).unwrap());
        let flights = vec![arrival("A1", at(8, 0)), arrival("A2", at(8, 10)), departure("D1", at(8, 20)), departure("D2", at(8, 30))];
        let profile = DemandProfile::from_flights(&flights, &schedule);

        assert_eq!(profile.congested_window(CapacityMode::PerClass), None);
        assert_eq!(profile.congested_window(CapacityMode::Combined), None);

        let event = CapacityEvent::new("single-runway", at(8, 0), at(9, 0)).with_total_rate(3);
        let reduced = CapacitySchedule::new(DefaultRates::new(2, 2, 2).unwrap(), vec![event]).unwrap();
        let profile = DemandProfile::from_flights(&flights, &reduced);

        assert_eq!(profile.congested_window(CapacityMode::Combined), Some((at(8, 0), at(9, 0))));
    }
}
