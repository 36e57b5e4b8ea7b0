use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::api::scenario_dto::FlightDto;
use crate::domain::airport::{AirportProfile, MAX_TAXI_OUT_MINUTES};
use crate::domain::utils::id::{AirportCode, Callsign};
use crate::error::ConversionError;

/// Longest enroute time accepted on an ingestion record.
pub const MAX_ENROUTE_MINUTES: i64 = 24 * 60;

/// Which runway resource a flight consumes at the regulated airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightClass {
    Arrival,
    Departure,
}

impl FromStr for FlightClass {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" | "arr" => Ok(FlightClass::Arrival),
            "departure" | "dep" => Ok(FlightClass::Departure),
            _ => Err(ConversionError::UnknownFlightClass(s.to_string())),
        }
    }
}

impl fmt::Display for FlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightClass::Arrival => write!(f, "arrival"),
            FlightClass::Departure => write!(f, "departure"),
        }
    }
}

/// One unit of demand: a flight wanting the runway at `desired_time`
/// (landing time for arrivals, takeoff time for departures).
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub callsign: Callsign,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub class: FlightClass,
    pub desired_time: DateTime<Utc>,

    /// Enroute time from origin takeoff to landing here; only meaningful for arrivals.
    pub enroute_minutes: Option<i64>,
    pub aircraft_type: Option<String>,
}

impl Flight {
    pub fn new(
        callsign: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        class: FlightClass,
        desired_time: DateTime<Utc>,
    ) -> Self {
        Flight {
            callsign: Callsign::new(callsign),
            origin: AirportCode::new(origin),
            destination: AirportCode::new(destination),
            class,
            desired_time,
            enroute_minutes: None,
            aircraft_type: None,
        }
    }

    pub fn with_enroute_minutes(mut self, enroute_minutes: i64) -> Self {
        self.enroute_minutes = Some(enroute_minutes);
        self
    }

    pub fn is_arrival(&self) -> bool {
        self.class == FlightClass::Arrival
    }

    /// Builds a flight from an ingestion record.
    ///
    /// The class falls back to the route relative to the airport. Without an
    /// explicit desired time it is derived from the EOBT:
    /// - departures: `EOBT + airport taxi-out`
    /// - arrivals: `EOBT + origin taxi-out + enroute time` (origin taxi-out defaults to the airport's)
    pub fn from_dto(dto: &FlightDto, airport: &AirportProfile) -> Result<Flight, MalformedFlight> {
        let callsign = dto.callsign.trim();

        if callsign.is_empty() {
            return Err(MalformedFlight::new(callsign, MalformedReason::MissingCallsign));
        }

        let class = match &dto.class {
            Some(raw) => raw.parse::<FlightClass>().map_err(|_| MalformedFlight::new(callsign, MalformedReason::UnknownClass))?,
            None => airport
                .classify(dto.origin.trim(), dto.destination.trim())
                .ok_or_else(|| MalformedFlight::new(callsign, MalformedReason::UnknownClass))?,
        };

        if dto.enroute_minutes.is_some_and(|m| !(0..=MAX_ENROUTE_MINUTES).contains(&m))
            || dto.origin_taxi_out_minutes.is_some_and(|m| !(0..=MAX_TAXI_OUT_MINUTES).contains(&m))
        {
            return Err(MalformedFlight::new(callsign, MalformedReason::InvalidDuration));
        }

        let desired_time = match dto.desired_time {
            Some(time) => time,
            None => derive_event_time(dto, class, airport).ok_or_else(|| MalformedFlight::new(callsign, MalformedReason::MissingDesiredTime))?,
        };

        Ok(Flight {
            callsign: Callsign::new(callsign),
            origin: AirportCode::new(dto.origin.trim()),
            destination: AirportCode::new(dto.destination.trim()),
            class,
            desired_time,
            enroute_minutes: dto.enroute_minutes,
            aircraft_type: dto.aircraft_type.clone(),
        })
    }
}

fn derive_event_time(dto: &FlightDto, class: FlightClass, airport: &AirportProfile) -> Option<DateTime<Utc>> {
    let eobt = dto.eobt?;

    let offset_minutes = match class {
        FlightClass::Departure => airport.taxi_out_minutes,
        FlightClass::Arrival => dto.origin_taxi_out_minutes.unwrap_or(airport.taxi_out_minutes).checked_add(dto.enroute_minutes?)?,
    };

    eobt.checked_add_signed(TimeDelta::try_minutes(offset_minutes)?)
}

impl From<&Flight> for FlightDto {
    fn from(flight: &Flight) -> Self {
        FlightDto {
            callsign: flight.callsign.to_string(),
            origin: flight.origin.to_string(),
            destination: flight.destination.to_string(),
            class: Some(flight.class.to_string()),
            desired_time: Some(flight.desired_time),
            eobt: None,
            enroute_minutes: flight.enroute_minutes,
            origin_taxi_out_minutes: None,
            aircraft_type: flight.aircraft_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    MissingCallsign,
    MissingDesiredTime,
    UnknownClass,
    DuplicateCallsign,
    /// Enroute or taxi-out time negative or beyond the accepted range.
    InvalidDuration,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingCallsign => write!(f, "missing callsign"),
            MalformedReason::MissingDesiredTime => write!(f, "missing desired event time"),
            MalformedReason::UnknownClass => write!(f, "class is neither given nor inferable from the route"),
            MalformedReason::DuplicateCallsign => write!(f, "callsign already used in this run"),
            MalformedReason::InvalidDuration => write!(f, "enroute or taxi-out time out of range"),
        }
    }
}

/// A flight record excluded from allocation. Reported back to the caller
/// instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedFlight {
    pub callsign: String,
    pub reason: MalformedReason,
}

impl MalformedFlight {
    pub fn new(callsign: impl Into<String>, reason: MalformedReason) -> Self {
        MalformedFlight { callsign: callsign.into(), reason }
    }
}

impl fmt::Display for MalformedFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.callsign.is_empty() {
            write!(f, "<unnamed>: {}", self.reason)
        } else {
            write!(f, "{}: {}", self.callsign, self.reason)
        }
    }
}
