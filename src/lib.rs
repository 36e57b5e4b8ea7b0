use crate::domain::simulation::simulation::{SimulationRequest, SimulationResult};
use crate::error::Result;
use crate::loader::parser::load_scenario;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads a scenario file and runs it once with the options it declares.
pub fn simulate_scenario_file(file_path: &str) -> Result<SimulationResult> {
    let scenario = load_scenario(file_path)?;
    log::info!("Scenario parsed: {} flight records.", scenario.flights.len());

    let request = SimulationRequest::from_dto(scenario)?;
    log::info!("Simulation request built for {}.", request.airport.icao);

    request.run()
}
