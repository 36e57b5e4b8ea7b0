use chrono::FixedOffset;

use crate::api::scenario_dto::AirportDto;
use crate::domain::flight::flight::FlightClass;
use crate::domain::utils::id::AirportCode;
use crate::error::{Error, Result};

const SECONDS_PER_HOUR: i32 = 3600;

/// Longest taxi-out time accepted for the airport or an origin.
pub const MAX_TAXI_OUT_MINUTES: i64 = 180;

/// The regulated airport: its code, a fixed UTC offset (no daylight saving) and
/// the default taxi-out time used to derive takeoff times from off-block times.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportProfile {
    pub icao: AirportCode,
    pub utc_offset: FixedOffset,
    pub taxi_out_minutes: i64,
}

impl AirportProfile {
    pub fn new(icao: impl Into<String>, utc_offset_hours: i32, taxi_out_minutes: i64) -> Result<Self> {
        let icao: String = icao.into();

        if icao.trim().is_empty() {
            return Err(Error::InvalidAirport("ICAO code must not be empty".to_string()));
        }

        if !(0..=MAX_TAXI_OUT_MINUTES).contains(&taxi_out_minutes) {
            return Err(Error::InvalidAirport(format!("taxi-out time must lie in [0, {}] minutes, got {}", MAX_TAXI_OUT_MINUTES, taxi_out_minutes)));
        }

        let utc_offset = FixedOffset::east_opt(utc_offset_hours * SECONDS_PER_HOUR)
            .ok_or_else(|| Error::InvalidAirport(format!("UTC offset of {} hours is out of range", utc_offset_hours)))?;

        Ok(AirportProfile { icao: AirportCode::new(icao.trim()), utc_offset, taxi_out_minutes })
    }

    pub fn from_dto(dto: &AirportDto) -> Result<Self> {
        Self::new(dto.icao.clone(), dto.utc_offset_hours, dto.taxi_out_minutes)
    }

    /// Arrival if the flight lands here, departure if it takes off here.
    pub fn classify(&self, origin: &str, destination: &str) -> Option<FlightClass> {
        if destination == self.icao.as_str() {
            Some(FlightClass::Arrival)
        } else if origin == self.icao.as_str() {
            Some(FlightClass::Departure)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_route() {
        let airport = AirportProfile::new("VVTS", 7, 15).unwrap();
        assert_eq!(airport.classify("VVNB", "VVTS"), Some(FlightClass::Arrival));
        assert_eq!(airport.classify("VVTS", "VVDN"), Some(FlightClass::Departure));
        assert_eq!(airport.classify("VVNB", "VVDN"), None);
    }

    #[test]
    fn test_rejects_invalid_profile() {
        assert!(matches!(AirportProfile::new("", 7, 15), Err(Error::InvalidAirport(_))));
        assert!(matches!(AirportProfile::new("VVTS", 30, 15), Err(Error::InvalidAirport(_))));
        assert!(matches!(AirportProfile::new("VVTS", 7, -1), Err(Error::InvalidAirport(_))));
        assert!(matches!(AirportProfile::new("VVTS", 7, i64::MAX), Err(Error::InvalidAirport(_))));
    }
}
