use std::str::FromStr;

use crate::api::scenario_dto::OptionsDto;
use crate::domain::allocation::policy::AllocationPolicy;
use crate::domain::capacity::capacity_schedule::CapacityMode;
use crate::error::{ConversionError, Error, Result};

/// Twelve hours of candidate time before a flight is given up on.
pub const DEFAULT_MAX_SEARCH_MINUTES: i64 = 12 * 60;

/// Longest search window accepted; one week of candidate time.
pub const MAX_SEARCH_MINUTES_LIMIT: i64 = 7 * 24 * 60;

/// Delays at or below this are rounding noise, not regulation.
pub const DEFAULT_REGULATION_EPSILON_MINUTES: f64 = 0.1;

/// Share of the departure rate always left to departures in the dual-pass policy.
pub const DEFAULT_DEPARTURE_FLOOR_FRACTION: f64 = 0.25;

/// Which regulated times a candidate must keep the minimum separation from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationScope {
    /// One runway time axis shared by arrivals and departures.
    #[default]
    Runway,
    /// Arrivals are separated from arrivals, departures from departures.
    PerClass,
}

impl FromStr for SeparationScope {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Runway" | "runway" | "global" => Ok(SeparationScope::Runway),
            "PerClass" | "per-class" | "per_class" => Ok(SeparationScope::PerClass),
            _ => Err(ConversionError::UnknownSeparationScope(s.to_string())),
        }
    }
}

/// Every tunable of one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatorOptions {
    pub policy: AllocationPolicy,
    pub capacity_mode: CapacityMode,
    pub separation_scope: SeparationScope,

    /// Upper bound on how far past its desired time a flight's candidate may move.
    pub max_search_minutes: i64,

    /// A flight counts as regulated when its delay exceeds this many minutes.
    pub regulation_epsilon_minutes: f64,

    /// Dual-pass only: departures keep at least `fraction * departure_rate` per hour.
    pub departure_floor_fraction: f64,
}

impl Default for AllocatorOptions {
    fn default() -> Self {
        AllocatorOptions {
            policy: AllocationPolicy::default(),
            capacity_mode: CapacityMode::default(),
            separation_scope: SeparationScope::default(),
            max_search_minutes: DEFAULT_MAX_SEARCH_MINUTES,
            regulation_epsilon_minutes: DEFAULT_REGULATION_EPSILON_MINUTES,
            departure_floor_fraction: DEFAULT_DEPARTURE_FLOOR_FRACTION,
        }
    }
}

impl AllocatorOptions {
    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_capacity_mode(mut self, capacity_mode: CapacityMode) -> Self {
        self.capacity_mode = capacity_mode;
        self
    }

    pub fn with_separation_scope(mut self, separation_scope: SeparationScope) -> Self {
        self.separation_scope = separation_scope;
        self
    }

    pub fn with_max_search_minutes(mut self, minutes: i64) -> Self {
        self.max_search_minutes = minutes;
        self
    }

    pub fn with_departure_floor_fraction(mut self, fraction: f64) -> Self {
        self.departure_floor_fraction = fraction;
        self
    }

    pub fn from_dto(dto: &OptionsDto) -> Result<Self> {
        let defaults = AllocatorOptions::default();

        let options = AllocatorOptions {
            policy: dto.policy.as_deref().map(str::parse::<AllocationPolicy>).transpose()?.unwrap_or(defaults.policy),
            capacity_mode: dto.capacity_mode.as_deref().map(str::parse::<CapacityMode>).transpose()?.unwrap_or(defaults.capacity_mode),
            separation_scope: dto.separation_scope.as_deref().map(str::parse::<SeparationScope>).transpose()?.unwrap_or(defaults.separation_scope),
            max_search_minutes: dto.max_search_minutes.unwrap_or(defaults.max_search_minutes),
            regulation_epsilon_minutes: dto.regulation_epsilon_minutes.unwrap_or(defaults.regulation_epsilon_minutes),
            departure_floor_fraction: dto.departure_floor_fraction.unwrap_or(defaults.departure_floor_fraction),
        };

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SEARCH_MINUTES_LIMIT).contains(&self.max_search_minutes) {
            return Err(Error::InvalidOption(format!(
                "max search window must lie in [1, {}] minutes, got {}",
                MAX_SEARCH_MINUTES_LIMIT, self.max_search_minutes
            )));
        }

        if !(self.regulation_epsilon_minutes >= 0.0) {
            return Err(Error::InvalidOption(format!("regulation epsilon must be non-negative, got {}", self.regulation_epsilon_minutes)));
        }

        if !(0.0..=1.0).contains(&self.departure_floor_fraction) {
            return Err(Error::InvalidOption(format!("departure floor fraction must lie in [0, 1], got {}", self.departure_floor_fraction)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AllocatorOptions::default();
        assert_eq!(options.policy, AllocationPolicy::Simple);
        assert_eq!(options.capacity_mode, CapacityMode::PerClass);
        assert_eq!(options.separation_scope, SeparationScope::Runway);
        assert_eq!(options.max_search_minutes, 720);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_dto_overrides() {
        let dto = OptionsDto {
            policy: Some("dual-pass".to_string()),
            capacity_mode: Some("combined".to_string()),
            separation_scope: Some("per-class".to_string()),
            max_search_minutes: Some(360),
            regulation_epsilon_minutes: None,
            departure_floor_fraction: Some(0.5),
        };

        let options = AllocatorOptions::from_dto(&dto).unwrap();
        assert_eq!(options.policy, AllocationPolicy::DualPass);
        assert_eq!(options.capacity_mode, CapacityMode::Combined);
        assert_eq!(options.separation_scope, SeparationScope::PerClass);
        assert_eq!(options.max_search_minutes, 360);
        assert_eq!(options.regulation_epsilon_minutes, DEFAULT_REGULATION_EPSILON_MINUTES);
        assert_eq!(options.departure_floor_fraction, 0.5);
    }

    #[test]
    fn test_from_dto_rejects_unknown_names_and_bad_values() {
        let unknown = OptionsDto { policy: Some("optimal".to_string()), ..Default::default() };
        assert!(matches!(AllocatorOptions::from_dto(&unknown), Err(Error::Conversion(ConversionError::UnknownPolicy(_)))));

        let negative = OptionsDto { max_search_minutes: Some(0), ..Default::default() };
        assert!(matches!(AllocatorOptions::from_dto(&negative), Err(Error::InvalidOption(_))));

        let floor = OptionsDto { departure_floor_fraction: Some(1.5), ..Default::default() };
        assert!(matches!(AllocatorOptions::from_dto(&floor), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_search_window_upper_bound() {
        let huge = OptionsDto { max_search_minutes: Some(1_000_000_000_000), ..Default::default() };
        assert!(matches!(AllocatorOptions::from_dto(&huge), Err(Error::InvalidOption(_))));

        assert!(AllocatorOptions::default().with_max_search_minutes(MAX_SEARCH_MINUTES_LIMIT).validate().is_ok());
        assert!(AllocatorOptions::default().with_max_search_minutes(MAX_SEARCH_MINUTES_LIMIT + 1).validate().is_err());
        assert!(AllocatorOptions::default().with_max_search_minutes(i64::MAX).validate().is_err());
    }
}
