use chrono::TimeDelta;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::scenario_dto::ComplianceDto;
use crate::domain::regulation::regulation_record::RegulationRecord;
use crate::error::{Error, Result};

pub const DEFAULT_MIN_OFFSET_MINUTES: i64 = -5;
pub const DEFAULT_MAX_OFFSET_MINUTES: i64 = 10;

/// Offsets beyond one day either way are rejected.
pub const MAX_OFFSET_MAGNITUDE_MINUTES: i64 = 24 * 60;

/// Inclusive range of the adherence offset around a regulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    pub min_offset_minutes: i64,
    pub max_offset_minutes: i64,
    /// Fixed seed for reproducible draws; entropy from the OS otherwise.
    pub seed: Option<u64>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        ComplianceConfig { min_offset_minutes: DEFAULT_MIN_OFFSET_MINUTES, max_offset_minutes: DEFAULT_MAX_OFFSET_MINUTES, seed: None }
    }
}

impl ComplianceConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_dto(dto: &ComplianceDto) -> Result<Self> {
        let defaults = ComplianceConfig::default();
        let config = ComplianceConfig {
            min_offset_minutes: dto.min_offset_minutes.unwrap_or(defaults.min_offset_minutes),
            max_offset_minutes: dto.max_offset_minutes.unwrap_or(defaults.max_offset_minutes),
            seed: dto.seed,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for offset in [self.min_offset_minutes, self.max_offset_minutes] {
            if !(-MAX_OFFSET_MAGNITUDE_MINUTES..=MAX_OFFSET_MAGNITUDE_MINUTES).contains(&offset) {
                return Err(Error::InvalidCompliance(format!(
                    "offset {} minutes is outside [-{}, {}]",
                    offset, MAX_OFFSET_MAGNITUDE_MINUTES, MAX_OFFSET_MAGNITUDE_MINUTES
                )));
            }
        }

        if self.min_offset_minutes > self.max_offset_minutes {
            return Err(Error::InvalidCompliance(format!(
                "minimum offset {} is greater than maximum offset {}",
                self.min_offset_minutes, self.max_offset_minutes
            )));
        }

        Ok(())
    }
}

/// Monte-Carlo overlay modelling how closely flights keep their slot.
///
/// Runs strictly after allocation and only writes `actual_utc`; the regulated
/// times are never touched.
#[derive(Debug)]
pub struct ComplianceSimulator {
    config: ComplianceConfig,
    rng: StdRng,
}

impl ComplianceSimulator {
    pub fn new(config: ComplianceConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(ComplianceSimulator { config, rng })
    }

    /// One uniformly drawn offset in `[min_offset_minutes, max_offset_minutes]`.
    pub fn draw_offset(&mut self) -> i64 {
        self.rng.random_range(self.config.min_offset_minutes..=self.config.max_offset_minutes)
    }

    /// Sets the actual time of every record: regulated flights get one random offset,
    /// all others keep their regulated time.
    pub fn apply(&mut self, records: Vec<RegulationRecord>) -> Vec<RegulationRecord> {
        records
            .into_iter()
            .map(|mut record| {
                let offset = if record.regulated { self.draw_offset() } else { 0 };
                record.actual_utc = Some(record.regulated_utc + TimeDelta::minutes(offset));
                record
            })
            .collect()
    }
}
