use anyhow::Context;
use clap::Parser;

use gdp_slot_allocator::domain::allocation::policy::AllocationPolicy;
use gdp_slot_allocator::domain::simulation::simulation::SimulationRequest;
use gdp_slot_allocator::loader::parser::load_scenario;
use gdp_slot_allocator::loader::result_writer::{write_records, write_records_to_file};
use gdp_slot_allocator::logger;

/// Runs a ground delay program simulation for one scenario file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scenario JSON file (airport, capacity, options, flights).
    scenario: String,

    /// CSV output file; written to stdout when omitted.
    #[arg(short, long)]
    output: Option<String>,

    /// Overrides the policy from the scenario: simple, selective or dual-pass.
    #[arg(short, long)]
    policy: Option<AllocationPolicy>,

    /// Seed for the compliance overlay. Enables the overlay when the scenario has none.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init();

    let scenario = load_scenario(&args.scenario).with_context(|| format!("could not load scenario '{}'", args.scenario))?;
    let mut request = SimulationRequest::from_dto(scenario).context("invalid scenario configuration")?;

    if let Some(policy) = args.policy {
        request.options = request.options.with_policy(policy);
    }

    if let Some(seed) = args.seed {
        request.compliance = Some(request.compliance.unwrap_or_default().with_seed(seed));
    }

    let result = request.run()?;

    log::info!(
        "Run {} finished: {} of {} flights regulated, total delay {:.1} min, {} rejected, {} without slot.",
        result.run_id,
        result.summary.regulated,
        result.summary.flights,
        result.summary.total_delay_minutes,
        result.rejected.len(),
        result.exhausted.len()
    );

    match &args.output {
        Some(path) => write_records_to_file(path, &result.records)?,
        None => write_records(std::io::stdout().lock(), &result.records)?,
    }

    Ok(())
}
