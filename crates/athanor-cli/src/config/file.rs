use crate::error::{CliError, Result};
use athanor::engine::settings::{
    BoxShape, NonbondedMethod, PartialChargeMethod, ProtocolSettings, SamplerMethod, SoftcoreLj,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One settings file on disk: every key optional, unknown keys rejected.
/// Keys are kebab-case; values reuse the core wire names (`pme`, `repex`,
/// `am1bcc`, ...). A file only ever narrows the gap between the defaults and
/// what the user wants, so absent keys mean "keep the current value".
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSettings {
    pub protocol_repeats: Option<usize>,
    pub forcefield: Option<FileForceField>,
    pub vacuum_forcefield: Option<FileForceField>,
    pub thermo: Option<FileThermo>,
    pub charge: Option<FileCharge>,
    pub solvation: Option<FileSolvation>,
    pub alchemical: Option<FileAlchemical>,
    pub lambda: Option<FileLambda>,
    pub engine: Option<FileEngine>,
    pub vacuum_engine: Option<FileEngine>,
    pub integrator: Option<FileIntegrator>,
    pub solvent_equilibration: Option<FileEquilibration>,
    pub vacuum_equilibration: Option<FileEquilibration>,
    pub solvent_simulation: Option<FileMultiState>,
    pub vacuum_simulation: Option<FileMultiState>,
    pub solvent_equil_output: Option<FileEquilOutput>,
    pub vacuum_equil_output: Option<FileEquilOutput>,
    pub solvent_output: Option<FileOutput>,
    pub vacuum_output: Option<FileOutput>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileForceField {
    pub forcefields: Option<Vec<String>>,
    pub nonbonded_method: Option<NonbondedMethod>,
    pub nonbonded_cutoff_nm: Option<f64>,
    pub hydrogen_mass_amu: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileThermo {
    pub temperature_kelvin: Option<f64>,
    pub pressure_bar: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileCharge {
    pub method: Option<PartialChargeMethod>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolvation {
    pub box_shape: Option<BoxShape>,
    pub solvent_padding_nm: Option<f64>,
    pub number_of_solvent_molecules: Option<u32>,
    pub assign_solvent_charges: Option<bool>,
    pub packing_tolerance_angstrom: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAlchemical {
    pub softcore_lj: Option<SoftcoreLj>,
    pub use_dispersion_correction: Option<bool>,
    pub endstate_dispersion_correction: Option<bool>,
    pub turn_off_core_unique_exceptions: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLambda {
    pub lambda_elec: Option<Vec<f64>>,
    pub lambda_vdw: Option<Vec<f64>>,
    pub lambda_restraints: Option<Vec<f64>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEngine {
    pub compute_platform: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIntegrator {
    pub timestep_fs: Option<f64>,
    pub langevin_collision_rate_per_ps: Option<f64>,
    pub barostat_frequency_steps: Option<u32>,
    pub constraint_tolerance: Option<f64>,
    pub reassign_velocities: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEquilibration {
    pub minimization_steps: Option<u32>,
    pub nvt_length_ns: Option<f64>,
    pub npt_length_ns: Option<f64>,
    pub production_length_ns: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileMultiState {
    pub n_replicas: Option<usize>,
    pub sampler_method: Option<SamplerMethod>,
    pub time_per_iteration_ps: Option<f64>,
    pub equilibration_length_ns: Option<f64>,
    pub production_length_ns: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEquilOutput {
    pub nvt_structure: Option<String>,
    pub npt_structure: Option<String>,
    pub production_trajectory: Option<String>,
    pub log_output: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutput {
    pub output_filename: Option<String>,
    pub checkpoint_filename: Option<String>,
    pub checkpoint_interval_ps: Option<f64>,
}

impl FileSettings {
    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] when the file cannot be read and
    /// [`CliError::FileParsing`] when it is not valid TOML or contains
    /// unknown keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: FileSettings = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!("Loaded settings file from {:?}", path);
        Ok(file)
    }

    /// A template carrying every value of `settings`, for the `settings`
    /// subcommand. Keys whose value is unset in the tree (for example the
    /// vacuum constant-volume stage) stay absent, matching what a parser
    /// would accept back.
    pub fn template(settings: &ProtocolSettings) -> Self {
        Self {
            protocol_repeats: Some(settings.protocol_repeats),
            forcefield: Some((&settings.forcefield).into()),
            vacuum_forcefield: Some((&settings.vacuum_forcefield).into()),
            thermo: Some(FileThermo {
                temperature_kelvin: Some(settings.thermo.temperature_kelvin),
                pressure_bar: Some(settings.thermo.pressure_bar),
            }),
            charge: Some(FileCharge {
                method: Some(settings.charge.method),
            }),
            solvation: Some(FileSolvation {
                box_shape: Some(settings.solvation.box_shape),
                solvent_padding_nm: settings.solvation.solvent_padding_nm,
                number_of_solvent_molecules: settings.solvation.number_of_solvent_molecules,
                assign_solvent_charges: Some(settings.solvation.assign_solvent_charges),
                packing_tolerance_angstrom: Some(settings.solvation.packing_tolerance_angstrom),
            }),
            alchemical: Some(FileAlchemical {
                softcore_lj: Some(settings.alchemical.softcore_lj),
                use_dispersion_correction: Some(settings.alchemical.use_dispersion_correction),
                endstate_dispersion_correction: Some(
                    settings.alchemical.endstate_dispersion_correction,
                ),
                turn_off_core_unique_exceptions: Some(
                    settings.alchemical.turn_off_core_unique_exceptions,
                ),
            }),
            lambda: Some(FileLambda {
                lambda_elec: Some(settings.lambda.lambda_elec.clone()),
                lambda_vdw: Some(settings.lambda.lambda_vdw.clone()),
                lambda_restraints: Some(settings.lambda.lambda_restraints.clone()),
            }),
            engine: Some(FileEngine {
                compute_platform: settings.engine.compute_platform.clone(),
            }),
            vacuum_engine: Some(FileEngine {
                compute_platform: settings.vacuum_engine.compute_platform.clone(),
            }),
            integrator: Some(FileIntegrator {
                timestep_fs: Some(settings.integrator.timestep_fs),
                langevin_collision_rate_per_ps: Some(
                    settings.integrator.langevin_collision_rate_per_ps,
                ),
                barostat_frequency_steps: Some(settings.integrator.barostat_frequency_steps),
                constraint_tolerance: Some(settings.integrator.constraint_tolerance),
                reassign_velocities: Some(settings.integrator.reassign_velocities),
            }),
            solvent_equilibration: Some((&settings.solvent_equilibration).into()),
            vacuum_equilibration: Some((&settings.vacuum_equilibration).into()),
            solvent_simulation: Some((&settings.solvent_simulation).into()),
            vacuum_simulation: Some((&settings.vacuum_simulation).into()),
            solvent_equil_output: Some((&settings.solvent_equil_output).into()),
            vacuum_equil_output: Some((&settings.vacuum_equil_output).into()),
            solvent_output: Some((&settings.solvent_output).into()),
            vacuum_output: Some((&settings.vacuum_output).into()),
        }
    }
}

impl From<&athanor::engine::settings::ForceFieldSettings> for FileForceField {
    fn from(s: &athanor::engine::settings::ForceFieldSettings) -> Self {
        Self {
            forcefields: Some(s.forcefields.clone()),
            nonbonded_method: Some(s.nonbonded_method),
            nonbonded_cutoff_nm: Some(s.nonbonded_cutoff_nm),
            hydrogen_mass_amu: Some(s.hydrogen_mass_amu),
        }
    }
}

impl From<&athanor::engine::settings::EquilibrationSettings> for FileEquilibration {
    fn from(s: &athanor::engine::settings::EquilibrationSettings) -> Self {
        Self {
            minimization_steps: Some(s.minimization_steps),
            nvt_length_ns: s.nvt_length_ns,
            npt_length_ns: Some(s.npt_length_ns),
            production_length_ns: Some(s.production_length_ns),
        }
    }
}

impl From<&athanor::engine::settings::MultiStateSettings> for FileMultiState {
    fn from(s: &athanor::engine::settings::MultiStateSettings) -> Self {
        Self {
            n_replicas: Some(s.n_replicas),
            sampler_method: Some(s.sampler_method),
            time_per_iteration_ps: Some(s.time_per_iteration_ps),
            equilibration_length_ns: Some(s.equilibration_length_ns),
            production_length_ns: Some(s.production_length_ns),
        }
    }
}

impl From<&athanor::engine::settings::EquilOutputSettings> for FileEquilOutput {
    fn from(s: &athanor::engine::settings::EquilOutputSettings) -> Self {
        Self {
            nvt_structure: s.nvt_structure.clone(),
            npt_structure: s.npt_structure.clone(),
            production_trajectory: s.production_trajectory.clone(),
            log_output: Some(s.log_output.clone()),
        }
    }
}

impl From<&athanor::engine::settings::OutputSettings> for FileOutput {
    fn from(s: &athanor::engine::settings::OutputSettings) -> Self {
        Self {
            output_filename: Some(s.output_filename.clone()),
            checkpoint_filename: Some(s.checkpoint_filename.clone()),
            checkpoint_interval_ps: Some(s.checkpoint_interval_ps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_a_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "protocol-repeats = 5\n\n\
             [solvation]\n\
             number-of-solvent-molecules = 750\n\n\
             [integrator]\n\
             timestep-fs = 2.0"
        )
        .unwrap();

        let parsed = FileSettings::from_file(file.path()).unwrap();
        assert_eq!(parsed.protocol_repeats, Some(5));
        let solvation = parsed.solvation.unwrap();
        assert_eq!(solvation.number_of_solvent_molecules, Some(750));
        assert_eq!(solvation.solvent_padding_nm, None);
        assert_eq!(parsed.integrator.unwrap().timestep_fs, Some(2.0));
        assert!(parsed.lambda.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "protocol-repeats = 3\nunknown-knob = true").unwrap();

        let result = FileSettings::from_file(file.path());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn enum_values_use_core_wire_names() {
        let parsed: FileSettings = toml::from_str(
            "[forcefield]\n\
             nonbonded-method = \"pme\"\n\n\
             [charge]\n\
             method = \"am1bccelf10\"\n\n\
             [solvent-simulation]\n\
             sampler-method = \"sams\"",
        )
        .unwrap();

        assert_eq!(
            parsed.forcefield.unwrap().nonbonded_method,
            Some(NonbondedMethod::Pme)
        );
        assert_eq!(
            parsed.charge.unwrap().method,
            Some(PartialChargeMethod::Am1BccElf10)
        );
        assert_eq!(
            parsed.solvent_simulation.unwrap().sampler_method,
            Some(SamplerMethod::Sams)
        );
    }

    #[test]
    fn missing_file_surfaces_an_io_error() {
        let result = FileSettings::from_file(Path::new("/nonexistent/settings.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn template_round_trips_through_toml() {
        let template = FileSettings::template(&ProtocolSettings::default());
        let text = toml::to_string_pretty(&template).unwrap();
        let reparsed: FileSettings = toml::from_str(&text).unwrap();
        assert_eq!(reparsed, template);
    }

    #[test]
    fn template_omits_unset_values() {
        let template = FileSettings::template(&ProtocolSettings::default());
        let text = toml::to_string_pretty(&template).unwrap();

        assert!(text.contains("protocol-repeats = 3"));
        assert!(text.contains("solvent-padding-nm = 1.2"));
        // The defaults size the box by padding, not by molecule count, and
        // the vacuum leg has no constant-volume stage.
        assert!(!text.contains("number-of-solvent-molecules"));
        let vacuum_equil = template.vacuum_equilibration.unwrap();
        assert_eq!(vacuum_equil.nvt_length_ns, None);
    }
}
