use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};

use crate::api::scenario_dto::CapacityConfigDto;
use crate::domain::capacity::capacity_event::CapacityEvent;
use crate::domain::flight::flight::FlightClass;
use crate::domain::utils::time::ceil_to_minute;
use crate::error::{ConversionError, Error, Result};

/// How hourly capacity is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityMode {
    /// Arrivals are limited by the AAR and departures by the ADR independently.
    #[default]
    PerClass,
    /// Arrivals and departures share one hourly budget.
    Combined,
}

impl FromStr for CapacityMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PerClass" | "per-class" | "per_class" => Ok(CapacityMode::PerClass),
            "Combined" | "combined" => Ok(CapacityMode::Combined),
            _ => Err(ConversionError::UnknownCapacityMode(s.to_string())),
        }
    }
}

/// Rates that apply whenever no capacity event covers an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRates {
    pub arrival_rate: u32,
    pub departure_rate: u32,
    pub min_separation_minutes: u32,
}

impl DefaultRates {
    /// Rejects non-positive values; the allocation loop is never entered with them.
    pub fn new(arrival_rate: i64, departure_rate: i64, min_separation_minutes: i64) -> Result<Self> {
        Ok(DefaultRates {
            arrival_rate: positive("arrival rate", arrival_rate)?,
            departure_rate: positive("departure rate", departure_rate)?,
            min_separation_minutes: positive("minimum separation", min_separation_minutes)?,
        })
    }
}

fn positive(field: &str, value: i64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(Error::InvalidCapacity(format!("default {} must be a positive integer, got {}", field, value))),
    }
}

/// Where a set of effective rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Default,
    /// Index into the schedule's event list, plus the end of that event.
    Event { index: usize, end: DateTime<Utc> },
}

/// Capacity in force at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRates {
    pub arrival_rate: u32,
    pub departure_rate: u32,
    pub total_rate: u32,
    pub min_separation_minutes: u32,
    pub source: RateSource,
}

impl EffectiveRates {
    pub fn capacity_for(&self, class: FlightClass, mode: CapacityMode) -> u32 {
        match (mode, class) {
            (CapacityMode::Combined, _) => self.total_rate,
            (CapacityMode::PerClass, FlightClass::Arrival) => self.arrival_rate,
            (CapacityMode::PerClass, FlightClass::Departure) => self.departure_rate,
        }
    }

    pub fn min_separation(&self) -> TimeDelta {
        TimeDelta::minutes(self.min_separation_minutes as i64)
    }

    /// First whole minute at which these rates may stop applying, when they come from an event.
    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        match self.source {
            RateSource::Default => None,
            RateSource::Event { end, .. } => Some(ceil_to_minute(end)),
        }
    }
}

/// Default rates combined with prioritized capacity events. Read-only during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacitySchedule {
    defaults: DefaultRates,
    events: Vec<CapacityEvent>,
}

impl CapacitySchedule {
    /// `events` are in priority order: where several cover the same instant, the first wins.
    pub fn new(defaults: DefaultRates, events: Vec<CapacityEvent>) -> Result<Self> {
        for event in &events {
            event.validate()?;
        }

        for (i, winner) in events.iter().enumerate() {
            for shadowed in events.iter().skip(i + 1).filter(|other| winner.overlaps(other)) {
                log::info!(
                    "Capacity events '{}' and '{}' overlap between {} and {}; '{}' takes precedence.",
                    winner.id,
                    shadowed.id,
                    winner.start.max(shadowed.start),
                    winner.end.min(shadowed.end),
                    winner.id
                );
            }
        }

        Ok(CapacitySchedule { defaults, events })
    }

    pub fn with_defaults(defaults: DefaultRates) -> Self {
        CapacitySchedule { defaults, events: Vec::new() }
    }

    pub fn from_dto(dto: &CapacityConfigDto) -> Result<Self> {
        let defaults = DefaultRates::new(dto.arrival_rate, dto.departure_rate, dto.min_separation_minutes)?;
        let events = dto.events.iter().enumerate().map(|(index, event)| CapacityEvent::from_dto(event, index)).collect::<Result<Vec<_>>>()?;

        Self::new(defaults, events)
    }

    pub fn defaults(&self) -> &DefaultRates {
        &self.defaults
    }

    pub fn events(&self) -> &[CapacityEvent] {
        &self.events
    }

    /// Resolves the rates for `instant`: the first event containing it, else the defaults.
    pub fn effective_rates(&self, instant: DateTime<Utc>) -> EffectiveRates {
        let matched = self.events.iter().enumerate().find(|(_, event)| event.contains(instant));

        match matched {
            None => EffectiveRates {
                arrival_rate: self.defaults.arrival_rate,
                departure_rate: self.defaults.departure_rate,
                total_rate: self.defaults.arrival_rate.saturating_add(self.defaults.departure_rate),
                min_separation_minutes: self.defaults.min_separation_minutes,
                source: RateSource::Default,
            },
            Some((index, event)) => {
                log::trace!("Capacity event '{}' governs {}.", event.id, instant);

                let arrival_rate = event.arrival_rate.unwrap_or(self.defaults.arrival_rate);
                let departure_rate = event.departure_rate.unwrap_or(self.defaults.departure_rate);

                EffectiveRates {
                    arrival_rate,
                    departure_rate,
                    total_rate: event.total_rate.unwrap_or(arrival_rate.saturating_add(departure_rate)),
                    min_separation_minutes: event.min_separation_minutes.unwrap_or(self.defaults.min_separation_minutes),
                    source: RateSource::Event { index, end: event.end },
                }
            }
        }
    }
}
