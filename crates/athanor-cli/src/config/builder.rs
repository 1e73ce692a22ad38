use super::file::{
    FileEquilOutput, FileEquilibration, FileForceField, FileMultiState, FileOutput, FileSettings,
};
use super::models::AppConfig;
use crate::cli::{InputArgs, SettingsOverrides};
use crate::error::Result;
use athanor::engine::protocol::SolvationProtocol;
use athanor::engine::settings::{
    EquilOutputSettings, EquilibrationSettings, ForceFieldSettings, LambdaSettings,
    MultiStateSettings, OutputSettings, ProtocolSettings,
};
use tracing::debug;

/// Resolves the final configuration with the precedence
/// CLI flags > settings file > built-in defaults, then validates the
/// resulting tree so every subcommand starts from a consistent state.
///
/// # Errors
///
/// Returns a file error when the settings file cannot be read or parsed,
/// and a configuration error when the merged tree violates an invariant.
pub fn build_config(input: &InputArgs, overrides: &SettingsOverrides) -> Result<AppConfig> {
    let mut settings = SolvationProtocol::default_settings();

    if let Some(path) = &input.config {
        let file = FileSettings::from_file(path)?;
        apply_file(&mut settings, file)?;
        debug!("Applied settings file overrides from {:?}", path);
    }

    apply_overrides(&mut settings, overrides);
    settings.validate()?;

    let dataset = input.dataset.clone().unwrap_or_else(|| {
        input
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    });

    Ok(AppConfig {
        input: input.input.clone(),
        dataset,
        settings,
    })
}

fn overlay<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn overlay_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn apply_file(settings: &mut ProtocolSettings, file: FileSettings) -> Result<()> {
    overlay(&mut settings.protocol_repeats, file.protocol_repeats);

    if let Some(ff) = file.forcefield {
        apply_forcefield(&mut settings.forcefield, ff);
    }
    if let Some(ff) = file.vacuum_forcefield {
        apply_forcefield(&mut settings.vacuum_forcefield, ff);
    }

    if let Some(thermo) = file.thermo {
        overlay(
            &mut settings.thermo.temperature_kelvin,
            thermo.temperature_kelvin,
        );
        overlay(&mut settings.thermo.pressure_bar, thermo.pressure_bar);
    }

    if let Some(charge) = file.charge {
        overlay(&mut settings.charge.method, charge.method);
    }

    if let Some(solvation) = file.solvation {
        overlay(&mut settings.solvation.box_shape, solvation.box_shape);
        overlay(
            &mut settings.solvation.assign_solvent_charges,
            solvation.assign_solvent_charges,
        );
        overlay(
            &mut settings.solvation.packing_tolerance_angstrom,
            solvation.packing_tolerance_angstrom,
        );
        // Naming one sizing mode in the file replaces the other; naming both
        // leaves both set so validate() can reject the combination.
        match (
            solvation.solvent_padding_nm,
            solvation.number_of_solvent_molecules,
        ) {
            (Some(padding), None) => {
                settings.solvation.solvent_padding_nm = Some(padding);
                settings.solvation.number_of_solvent_molecules = None;
            }
            (None, Some(count)) => {
                settings.solvation.number_of_solvent_molecules = Some(count);
                settings.solvation.solvent_padding_nm = None;
            }
            (Some(padding), Some(count)) => {
                settings.solvation.solvent_padding_nm = Some(padding);
                settings.solvation.number_of_solvent_molecules = Some(count);
            }
            (None, None) => {}
        }
    }

    if let Some(alchemical) = file.alchemical {
        overlay(&mut settings.alchemical.softcore_lj, alchemical.softcore_lj);
        overlay(
            &mut settings.alchemical.use_dispersion_correction,
            alchemical.use_dispersion_correction,
        );
        overlay(
            &mut settings.alchemical.endstate_dispersion_correction,
            alchemical.endstate_dispersion_correction,
        );
        overlay(
            &mut settings.alchemical.turn_off_core_unique_exceptions,
            alchemical.turn_off_core_unique_exceptions,
        );
    }

    if let Some(lambda) = file.lambda {
        let elec = lambda
            .lambda_elec
            .unwrap_or_else(|| settings.lambda.lambda_elec.clone());
        let vdw = lambda
            .lambda_vdw
            .unwrap_or_else(|| settings.lambda.lambda_vdw.clone());
        let restraints = lambda
            .lambda_restraints
            .unwrap_or_else(|| settings.lambda.lambda_restraints.clone());
        settings.lambda = LambdaSettings::new(elec, vdw, restraints)?;
    }

    if let Some(engine) = file.engine {
        overlay_opt(
            &mut settings.engine.compute_platform,
            engine.compute_platform,
        );
    }
    if let Some(engine) = file.vacuum_engine {
        overlay_opt(
            &mut settings.vacuum_engine.compute_platform,
            engine.compute_platform,
        );
    }

    if let Some(integrator) = file.integrator {
        overlay(&mut settings.integrator.timestep_fs, integrator.timestep_fs);
        overlay(
            &mut settings.integrator.langevin_collision_rate_per_ps,
            integrator.langevin_collision_rate_per_ps,
        );
        overlay(
            &mut settings.integrator.barostat_frequency_steps,
            integrator.barostat_frequency_steps,
        );
        overlay(
            &mut settings.integrator.constraint_tolerance,
            integrator.constraint_tolerance,
        );
        overlay(
            &mut settings.integrator.reassign_velocities,
            integrator.reassign_velocities,
        );
    }

    if let Some(equil) = file.solvent_equilibration {
        apply_equilibration(&mut settings.solvent_equilibration, equil);
    }
    if let Some(equil) = file.vacuum_equilibration {
        apply_equilibration(&mut settings.vacuum_equilibration, equil);
    }

    if let Some(sim) = file.solvent_simulation {
        apply_simulation(&mut settings.solvent_simulation, sim);
    }
    if let Some(sim) = file.vacuum_simulation {
        apply_simulation(&mut settings.vacuum_simulation, sim);
    }

    if let Some(output) = file.solvent_equil_output {
        apply_equil_output(&mut settings.solvent_equil_output, output);
    }
    if let Some(output) = file.vacuum_equil_output {
        apply_equil_output(&mut settings.vacuum_equil_output, output);
    }

    if let Some(output) = file.solvent_output {
        apply_output(&mut settings.solvent_output, output);
    }
    if let Some(output) = file.vacuum_output {
        apply_output(&mut settings.vacuum_output, output);
    }

    Ok(())
}

fn apply_forcefield(settings: &mut ForceFieldSettings, file: FileForceField) {
    overlay(&mut settings.forcefields, file.forcefields);
    overlay(&mut settings.nonbonded_method, file.nonbonded_method);
    overlay(&mut settings.nonbonded_cutoff_nm, file.nonbonded_cutoff_nm);
    overlay(&mut settings.hydrogen_mass_amu, file.hydrogen_mass_amu);
}

fn apply_equilibration(settings: &mut EquilibrationSettings, file: FileEquilibration) {
    overlay(&mut settings.minimization_steps, file.minimization_steps);
    overlay_opt(&mut settings.nvt_length_ns, file.nvt_length_ns);
    overlay(&mut settings.npt_length_ns, file.npt_length_ns);
    overlay(&mut settings.production_length_ns, file.production_length_ns);
}

fn apply_simulation(settings: &mut MultiStateSettings, file: FileMultiState) {
    overlay(&mut settings.n_replicas, file.n_replicas);
    overlay(&mut settings.sampler_method, file.sampler_method);
    overlay(
        &mut settings.time_per_iteration_ps,
        file.time_per_iteration_ps,
    );
    overlay(
        &mut settings.equilibration_length_ns,
        file.equilibration_length_ns,
    );
    overlay(&mut settings.production_length_ns, file.production_length_ns);
}

fn apply_equil_output(settings: &mut EquilOutputSettings, file: FileEquilOutput) {
    overlay_opt(&mut settings.nvt_structure, file.nvt_structure);
    overlay_opt(&mut settings.npt_structure, file.npt_structure);
    overlay_opt(
        &mut settings.production_trajectory,
        file.production_trajectory,
    );
    overlay(&mut settings.log_output, file.log_output);
}

fn apply_output(settings: &mut OutputSettings, file: FileOutput) {
    overlay(&mut settings.output_filename, file.output_filename);
    overlay(&mut settings.checkpoint_filename, file.checkpoint_filename);
    overlay(
        &mut settings.checkpoint_interval_ps,
        file.checkpoint_interval_ps,
    );
}

fn apply_overrides(settings: &mut ProtocolSettings, overrides: &SettingsOverrides) {
    overlay(&mut settings.protocol_repeats, overrides.repeats);

    if let Some(padding) = overrides.padding_nm {
        settings.solvation.solvent_padding_nm = Some(padding);
        settings.solvation.number_of_solvent_molecules = None;
    }
    if let Some(count) = overrides.n_solvent_molecules {
        settings.solvation.number_of_solvent_molecules = Some(count);
        settings.solvation.solvent_padding_nm = None;
    }

    overlay(&mut settings.integrator.timestep_fs, overrides.timestep_fs);

    if let Some(mass) = overrides.hydrogen_mass_amu {
        settings.forcefield.hydrogen_mass_amu = mass;
        settings.vacuum_forcefield.hydrogen_mass_amu = mass;
    }

    if let Some(platform) = &overrides.platform {
        settings.engine.compute_platform = Some(platform.clone());
        settings.vacuum_engine.compute_platform = Some(platform.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use athanor::engine::error::ConfigurationError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn input_args(config: Option<PathBuf>) -> InputArgs {
        InputArgs {
            input: PathBuf::from("molecules/freesolv.sdf"),
            config,
            dataset: None,
        }
    }

    fn no_overrides() -> SettingsOverrides {
        SettingsOverrides {
            repeats: None,
            padding_nm: None,
            n_solvent_molecules: None,
            timestep_fs: None,
            hydrogen_mass_amu: None,
            platform: None,
        }
    }

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn defaults_pass_through_untouched() {
        let config = build_config(&input_args(None), &no_overrides()).unwrap();
        assert_eq!(config.settings, ProtocolSettings::default());
        assert_eq!(config.dataset, "freesolv");
        assert_eq!(config.input, PathBuf::from("molecules/freesolv.sdf"));
    }

    #[test]
    fn explicit_dataset_name_wins_over_the_file_stem() {
        let mut args = input_args(None);
        args.dataset = Some("hydration-benchmark".to_string());
        let config = build_config(&args, &no_overrides()).unwrap();
        assert_eq!(config.dataset, "hydration-benchmark");
    }

    #[test]
    fn file_values_replace_defaults() {
        let file = settings_file(
            "protocol-repeats = 1\n\n\
             [solvation]\n\
             number-of-solvent-molecules = 750\n\n\
             [integrator]\n\
             timestep-fs = 2.0\n\n\
             [vacuum-simulation]\n\
             production-length-ns = 5.0\n",
        );

        let config =
            build_config(&input_args(Some(file.path().to_path_buf())), &no_overrides()).unwrap();
        assert_eq!(config.settings.protocol_repeats, 1);
        assert_eq!(
            config.settings.solvation.number_of_solvent_molecules,
            Some(750)
        );
        assert_eq!(config.settings.solvation.solvent_padding_nm, None);
        assert_eq!(config.settings.integrator.timestep_fs, 2.0);
        assert_eq!(config.settings.vacuum_simulation.production_length_ns, 5.0);
        // Untouched groups stay at their defaults.
        assert_eq!(config.settings.solvent_simulation.production_length_ns, 10.0);
    }

    #[test]
    fn cli_flags_beat_the_file() {
        let file = settings_file("protocol-repeats = 1\n");
        let overrides = SettingsOverrides {
            repeats: Some(5),
            ..no_overrides()
        };

        let config =
            build_config(&input_args(Some(file.path().to_path_buf())), &overrides).unwrap();
        assert_eq!(config.settings.protocol_repeats, 5);
    }

    #[test]
    fn sizing_override_clears_the_other_mode() {
        let overrides = SettingsOverrides {
            n_solvent_molecules: Some(500),
            ..no_overrides()
        };
        let config = build_config(&input_args(None), &overrides).unwrap();
        assert_eq!(
            config.settings.solvation.number_of_solvent_molecules,
            Some(500)
        );
        assert_eq!(config.settings.solvation.solvent_padding_nm, None);
    }

    #[test]
    fn hydrogen_mass_override_applies_to_both_legs() {
        let overrides = SettingsOverrides {
            hydrogen_mass_amu: Some(1.008),
            timestep_fs: Some(2.0),
            ..no_overrides()
        };
        let config = build_config(&input_args(None), &overrides).unwrap();
        assert_eq!(config.settings.forcefield.hydrogen_mass_amu, 1.008);
        assert_eq!(config.settings.vacuum_forcefield.hydrogen_mass_amu, 1.008);
    }

    #[test]
    fn partial_lambda_arrays_from_the_file_are_rejected() {
        let file = settings_file("[lambda]\nlambda-elec = [0.0, 0.5, 1.0]\n");

        let result = build_config(&input_args(Some(file.path().to_path_buf())), &no_overrides());
        assert!(matches!(
            result,
            Err(CliError::Configuration(
                ConfigurationError::ScheduleLengthMismatch { elec: 3, .. }
            ))
        ));
    }

    #[test]
    fn merged_tree_is_validated() {
        let file = settings_file("[thermo]\ntemperature-kelvin = -10.0\n");

        let result = build_config(&input_args(Some(file.path().to_path_buf())), &no_overrides());
        assert!(matches!(
            result,
            Err(CliError::Configuration(
                ConfigurationError::InvalidParameter { .. }
            ))
        ));
    }
}
