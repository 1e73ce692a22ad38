use crate::cli::CheckArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use athanor::core::ingest::{SolventCache, load_solvation_systems};
use athanor::engine::progress::ProgressReporter;
use athanor::workflows;
use tracing::{info, warn};

pub fn run(args: CheckArgs) -> Result<()> {
    let config = build_config(&args.input, &args.overrides)?;

    info!("Loading dataset from {:?}", &config.input);
    let mut cache = SolventCache::new();
    let systems = load_solvation_systems(&config.input, &config.dataset, &mut cache)?;
    println!(
        "Checking {} system(s) from dataset '{}'...",
        systems.len(),
        config.dataset
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let total = systems.len();
    let mut failed = 0usize;
    for system in systems {
        let name = system.name().to_string();
        let state_b = system.without("solute");

        match workflows::solvation::plan(system, state_b, config.settings.clone(), &reporter) {
            Ok(units) => {
                println!("✓ {} ({} units)", name, units.len());
            }
            Err(error) => {
                warn!(system = %name, %error, "Transformation failed validation.");
                println!("✗ {}: {}", name, error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed { failed, total });
    }

    println!("All {} system(s) passed validation.", total);
    Ok(())
}
