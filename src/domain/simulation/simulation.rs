use std::collections::HashSet;
use std::thread;

use uuid::Uuid;

use crate::api::scenario_dto::{FlightDto, ScenarioDto};
use crate::domain::airport::AirportProfile;
use crate::domain::allocation::allocator::SlotAllocator;
use crate::domain::allocation::options::AllocatorOptions;
use crate::domain::allocation::policy::AllocationPolicy;
use crate::domain::capacity::capacity_schedule::CapacitySchedule;
use crate::domain::compliance::compliance_simulator::{ComplianceConfig, ComplianceSimulator};
use crate::domain::flight::demand::{Advisory, DemandProfile};
use crate::domain::flight::flight::{Flight, MalformedFlight, MalformedReason};
use crate::domain::regulation::regulation_record::RegulationRecord;
use crate::domain::regulation::result_formatter::ResultFormatter;
use crate::domain::regulation::summary::RegulationSummary;
use crate::domain::simulation::statistics;
use crate::domain::utils::id::Callsign;
use crate::error::Result;

/// Everything one simulation run needs. Immutable once built; a what-if variant is a
/// modified clone.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub airport: AirportProfile,
    pub schedule: CapacitySchedule,
    pub options: AllocatorOptions,
    /// Compliance overlay; skipped when `None`.
    pub compliance: Option<ComplianceConfig>,
    pub flights: Vec<FlightDto>,
}

/// Outcome of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub run_id: Uuid,
    pub policy: AllocationPolicy,
    /// One record per accepted flight, ordered by `(desired time, callsign)`.
    pub records: Vec<RegulationRecord>,
    /// Records excluded before allocation.
    pub rejected: Vec<MalformedFlight>,
    /// Flights that kept their desired time because the search window ran out.
    pub exhausted: Vec<Callsign>,
    pub summary: RegulationSummary,
    /// Hourly demand at the desired times.
    pub demand: DemandProfile,
    /// Hourly demand at the regulated times.
    pub regulated_demand: DemandProfile,
    pub advisories: Vec<Advisory>,
}

impl SimulationRequest {
    pub fn new(airport: AirportProfile, schedule: CapacitySchedule, options: AllocatorOptions) -> Self {
        SimulationRequest { airport, schedule, options, compliance: None, flights: Vec::new() }
    }

    pub fn with_flights(mut self, flights: Vec<FlightDto>) -> Self {
        self.flights = flights;
        self
    }

    pub fn with_compliance(mut self, compliance: ComplianceConfig) -> Self {
        self.compliance = Some(compliance);
        self
    }

    pub fn with_options(mut self, options: AllocatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_dto(dto: ScenarioDto) -> Result<Self> {
        let airport = AirportProfile::from_dto(&dto.airport)?;
        let schedule = CapacitySchedule::from_dto(&dto.capacity)?;
        let options = AllocatorOptions::from_dto(&dto.options)?;
        let compliance = dto.compliance.as_ref().map(ComplianceConfig::from_dto).transpose()?;

        Ok(SimulationRequest { airport, schedule, options, compliance, flights: dto.flights })
    }

    /// Validates the flight records, allocates, formats and optionally applies the
    /// compliance overlay.
    ///
    /// Fails only on invalid configuration. Problems with single flights end up in
    /// [`SimulationResult::rejected`] or [`SimulationResult::exhausted`].
    pub fn run(&self) -> Result<SimulationResult> {
        self.options.validate()?;

        let run_id = Uuid::new_v4();
        let (flights, rejected) = self.accept_flights();

        for malformed in &rejected {
            log::warn!("Flight record rejected: {}", malformed);
        }

        log::info!(
            "Run {}: {} flights accepted, {} rejected, policy {}.",
            run_id,
            flights.len(),
            rejected.len(),
            self.options.policy
        );

        let demand = DemandProfile::from_flights(&flights, &self.schedule);
        let advisories = demand.advisories();

        for advisory in &advisories {
            log::info!("{}: {}", advisory.title, advisory.body);
        }

        let allocation = SlotAllocator::new(&self.schedule, self.options.clone()).allocate(flights);

        let formatter = ResultFormatter::new(self.airport.utc_offset, self.options.regulation_epsilon_minutes);
        let mut records = formatter.format(&allocation);

        if let Some(config) = self.compliance {
            records = ComplianceSimulator::new(config)?.apply(records);
        }

        let regulated_demand = DemandProfile::from_events(records.iter().map(|r| (r.class, r.regulated_utc)), &self.schedule);
        let summary = RegulationSummary::from_records(&records);

        statistics::log_run_summary(run_id, allocation.policy, &summary, rejected.len());

        Ok(SimulationResult {
            run_id,
            policy: allocation.policy,
            records,
            rejected,
            exhausted: allocation.exhausted,
            summary,
            demand,
            regulated_demand,
            advisories,
        })
    }

    /// Splits the records into valid flights and rejected ones. A repeated callsign
    /// rejects the later record; the first one stays.
    fn accept_flights(&self) -> (Vec<Flight>, Vec<MalformedFlight>) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut flights = Vec::with_capacity(self.flights.len());
        let mut rejected = Vec::new();

        for dto in &self.flights {
            match Flight::from_dto(dto, &self.airport) {
                Ok(flight) => {
                    if seen.insert(flight.callsign.to_string()) {
                        flights.push(flight);
                    } else {
                        rejected.push(MalformedFlight::new(flight.callsign.as_str(), MalformedReason::DuplicateCallsign));
                    }
                }
                Err(malformed) => rejected.push(malformed),
            }
        }

        (flights, rejected)
    }
}

/// Runs independent requests (e.g. alternative capacity configurations) on scoped
/// threads. Results come back in request order.
pub fn run_what_if(requests: &[SimulationRequest]) -> Vec<Result<SimulationResult>> {
    thread::scope(|scope| {
        let handles: Vec<_> = requests.iter().map(|request| scope.spawn(move || request.run())).collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
