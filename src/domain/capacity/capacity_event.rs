use chrono::{DateTime, Utc};

use crate::api::scenario_dto::CapacityEventDto;
use crate::domain::utils::id::CapacityEventId;
use crate::error::{Error, Result};

/// A scheduled capacity change over the half-open interval `[start, end)`.
///
/// Absent values fall back to the schedule defaults. A rate of `0` closes the
/// resource for the duration of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityEvent {
    pub id: CapacityEventId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub arrival_rate: Option<u32>,
    pub departure_rate: Option<u32>,
    /// Cap on arrivals plus departures per hour.
    pub total_rate: Option<u32>,
    pub min_separation_minutes: Option<u32>,
}

impl CapacityEvent {
    pub fn new(id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        CapacityEvent {
            id: CapacityEventId::new(id),
            start,
            end,
            arrival_rate: None,
            departure_rate: None,
            total_rate: None,
            min_separation_minutes: None,
        }
    }

    pub fn with_arrival_rate(mut self, rate: u32) -> Self {
        self.arrival_rate = Some(rate);
        self
    }

    pub fn with_departure_rate(mut self, rate: u32) -> Self {
        self.departure_rate = Some(rate);
        self
    }

    pub fn with_total_rate(mut self, rate: u32) -> Self {
        self.total_rate = Some(rate);
        self
    }

    pub fn with_min_separation(mut self, minutes: u32) -> Self {
        self.min_separation_minutes = Some(minutes);
        self
    }

    /// `index` names events that come without an id.
    pub fn from_dto(dto: &CapacityEventDto, index: usize) -> Result<Self> {
        let id = dto.id.clone().unwrap_or_else(|| format!("event-{}", index + 1));

        let event = CapacityEvent {
            id: CapacityEventId::new(id.clone()),
            start: dto.start,
            end: dto.end,
            arrival_rate: to_rate(&id, "arrival rate", dto.arrival_rate)?,
            departure_rate: to_rate(&id, "departure rate", dto.departure_rate)?,
            total_rate: to_rate(&id, "total rate", dto.total_rate)?,
            min_separation_minutes: to_rate(&id, "minimum separation", dto.min_separation_minutes)?,
        };

        event.validate()?;
        Ok(event)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn overlaps(&self, other: &CapacityEvent) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(Error::InvalidCapacityEvent {
                id: self.id.to_string(),
                reason: format!("end {} is not after start {}", self.end, self.start),
            });
        }

        if self.min_separation_minutes == Some(0) {
            return Err(Error::InvalidCapacityEvent { id: self.id.to_string(), reason: "separation override must be positive".to_string() });
        }

        Ok(())
    }
}

fn to_rate(id: &str, field: &str, value: Option<i64>) -> Result<Option<u32>> {
    match value {
        None => Ok(None),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| Error::InvalidCapacityEvent { id: id.to_string(), reason: format!("{} must be a non-negative integer, got {}", field, v) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, 0, 0).unwrap()
    }

    #[test]
    fn test_interval_is_half_open() {
        let event = CapacityEvent::new("storm", at(9), at(10));
        assert!(!event.contains(at(8)));
        assert!(event.contains(at(9)));
        assert!(!event.contains(at(10)));
    }

    #[test]
    fn test_overlap() {
        let a = CapacityEvent::new("a", at(9), at(11));
        let b = CapacityEvent::new("b", at(10), at(12));
        let c = CapacityEvent::new("c", at(11), at(12));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_validation() {
        assert!(CapacityEvent::new("empty", at(9), at(9)).validate().is_err());
        assert!(CapacityEvent::new("zero-sep", at(9), at(10)).with_min_separation(0).validate().is_err());
        assert!(CapacityEvent::new("closed", at(9), at(10)).with_arrival_rate(0).validate().is_ok());
    }

    #[test]
    fn test_from_dto_rejects_negative_rate() {
        let dto = CapacityEventDto {
            id: None,
            start: at(9),
            end: at(10),
            arrival_rate: Some(-3),
            departure_rate: None,
            total_rate: None,
            min_separation_minutes: None,
        };

        match CapacityEvent::from_dto(&dto, 0) {
            Err(Error::InvalidCapacityEvent { id, .. }) => assert_eq!(id, "event-1"),
            other => panic!("expected InvalidCapacityEvent, got {:?}", other),
        }
    }
}
