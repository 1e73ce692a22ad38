use crate::cli::PlanArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use athanor::core::ingest::{SolventCache, load_solvation_systems};
use athanor::engine::progress::ProgressReporter;
use athanor::engine::unit::{ExecutionUnit, Phase};
use athanor::workflows;
use serde::Serialize;
use tracing::info;

#[derive(Serialize, Debug)]
struct PlanReport {
    dataset: String,
    windows: usize,
    protocol_repeats: usize,
    systems: Vec<SystemPlan>,
}

#[derive(Serialize, Debug)]
struct SystemPlan {
    system: String,
    units: Vec<UnitRow>,
}

#[derive(Serialize, Debug)]
struct UnitRow {
    label: String,
    phase: Phase,
    repeat_id: String,
    generation: u32,
}

impl From<&ExecutionUnit> for UnitRow {
    fn from(unit: &ExecutionUnit) -> Self {
        Self {
            label: unit.label().to_string(),
            phase: unit.phase(),
            repeat_id: unit.repeat_id().to_string(),
            generation: unit.generation(),
        }
    }
}

pub fn run(args: PlanArgs) -> Result<()> {
    let config = build_config(&args.input, &args.overrides)?;
    let windows = config.settings.lambda.window_count()?;

    info!("Loading dataset from {:?}", &config.input);
    let mut cache = SolventCache::new();
    let systems = load_solvation_systems(&config.input, &config.dataset, &mut cache)?;
    println!(
        "Planning {} system(s) from dataset '{}' ({} lambda windows, {} repeat(s) per leg)...",
        systems.len(),
        config.dataset,
        windows,
        config.settings.protocol_repeats
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut report = PlanReport {
        dataset: config.dataset.clone(),
        windows,
        protocol_repeats: config.settings.protocol_repeats,
        systems: Vec::new(),
    };

    for system in systems {
        let name = system.name().to_string();
        let state_b = system.without("solute");
        let units =
            workflows::solvation::plan(system, state_b, config.settings.clone(), &reporter)?;

        println!("{}:", name);
        for unit in &units {
            println!("  [{}] {}", unit.repeat_id(), unit.label());
        }

        report.systems.push(SystemPlan {
            system: name,
            units: units.iter().map(Into::into).collect(),
        });
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report).map_err(|e| CliError::Other(e.into()))?;
        std::fs::write(path, json)?;
        println!("Plan report written to {}", path.display());
    }

    let total_units: usize = report.systems.iter().map(|s| s.units.len()).sum();
    println!(
        "Planned {} unit(s) across {} system(s).",
        total_units,
        report.systems.len()
    );
    Ok(())
}
