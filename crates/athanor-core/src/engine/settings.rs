//! Parameter groups describing a full solvation campaign: force fields,
//! thermodynamic conditions, the alchemical schedule, and per-phase
//! simulation control. Pure data plus self-consistency checks; no physics
//! happens here.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ConfigurationError;

/// Closed enumeration of long-range nonbonded treatments. Condensed-phase
/// simulations require the lattice-sum method, gas-phase ones the cutoff-free
/// method; the validation layer enforces the pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonbondedMethod {
    Pme,
    NoCutoff,
}

impl fmt::Display for NonbondedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonbondedMethod::Pme => write!(f, "pme"),
            NonbondedMethod::NoCutoff => write!(f, "nocutoff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialChargeMethod {
    #[serde(rename = "am1bcc")]
    Am1Bcc,
    #[serde(rename = "am1bccelf10")]
    Am1BccElf10,
    Nagl,
    Espaloma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxShape {
    Cube,
    Dodecahedron,
    Octahedron,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftcoreLj {
    Gapsys,
    Beutler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerMethod {
    Repex,
    Sams,
    Independent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceFieldSettings {
    pub forcefields: Vec<String>,
    pub nonbonded_method: NonbondedMethod,
    pub nonbonded_cutoff_nm: f64,
    pub hydrogen_mass_amu: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoSettings {
    pub temperature_kelvin: f64,
    pub pressure_bar: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSettings {
    pub method: PartialChargeMethod,
}

/// How the condensed-phase box is packed. Exactly one of
/// `solvent_padding_nm` and `number_of_solvent_molecules` must be set; the
/// two sizing modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvationSettings {
    pub box_shape: BoxShape,
    pub solvent_padding_nm: Option<f64>,
    pub number_of_solvent_molecules: Option<u32>,
    pub assign_solvent_charges: bool,
    pub packing_tolerance_angstrom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlchemicalSettings {
    pub softcore_lj: SoftcoreLj,
    pub use_dispersion_correction: bool,
    pub endstate_dispersion_correction: bool,
    pub turn_off_core_unique_exceptions: bool,
}

/// The coupling schedule: one value per replica window for each interaction
/// class, each in [0, 1] and monotonic in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaSettings {
    pub lambda_elec: Vec<f64>,
    pub lambda_vdw: Vec<f64>,
    pub lambda_restraints: Vec<f64>,
}

fn is_monotonic(values: &[f64]) -> bool {
    let non_decreasing = values.windows(2).all(|w| w[0] <= w[1]);
    let non_increasing = values.windows(2).all(|w| w[0] >= w[1]);
    non_decreasing || non_increasing
}

impl LambdaSettings {
    /// Builds a schedule, rejecting windows outside [0, 1], non-monotonic
    /// arrays, and arrays of unequal length.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the offending array.
    pub fn new(
        lambda_elec: Vec<f64>,
        lambda_vdw: Vec<f64>,
        lambda_restraints: Vec<f64>,
    ) -> Result<Self, ConfigurationError> {
        let settings = Self {
            lambda_elec,
            lambda_vdw,
            lambda_restraints,
        };
        settings.check_ranges()?;
        settings.check_monotonic()?;
        settings.window_count()?;
        Ok(settings)
    }

    fn arrays(&self) -> [(&'static str, &[f64]); 3] {
        [
            ("lambda_elec", &self.lambda_elec),
            ("lambda_vdw", &self.lambda_vdw),
            ("lambda_restraints", &self.lambda_restraints),
        ]
    }

    pub(crate) fn check_ranges(&self) -> Result<(), ConfigurationError> {
        for (field, values) in self.arrays() {
            for (window, value) in values.iter().enumerate() {
                if !(0.0..=1.0).contains(value) {
                    return Err(ConfigurationError::InvalidParameter {
                        field,
                        reason: format!("value {} at window {} is outside [0, 1]", value, window),
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn check_monotonic(&self) -> Result<(), ConfigurationError> {
        for (field, values) in self.arrays() {
            if !is_monotonic(values) {
                return Err(ConfigurationError::InvalidParameter {
                    field,
                    reason: "schedule must be monotonic in one direction".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The number of replica windows the schedule defines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ScheduleLengthMismatch`] when the three
    /// arrays disagree in length.
    pub fn window_count(&self) -> Result<usize, ConfigurationError> {
        let (elec, vdw, restraints) = (
            self.lambda_elec.len(),
            self.lambda_vdw.len(),
            self.lambda_restraints.len(),
        );
        if elec != vdw || elec != restraints {
            return Err(ConfigurationError::ScheduleLengthMismatch {
                elec,
                vdw,
                restraints,
            });
        }
        Ok(elec)
    }
}

impl Default for LambdaSettings {
    /// The 14-window decoupling schedule: electrostatics off over the first
    /// five windows, van der Waals off over the remaining nine, restraints
    /// unused.
    fn default() -> Self {
        Self {
            lambda_elec: vec![
                0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
            ],
            lambda_vdw: vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 0.12, 0.24, 0.36, 0.48, 0.6, 0.7, 0.77, 0.85, 1.0,
            ],
            lambda_restraints: vec![0.0; 14],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub compute_platform: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    pub timestep_fs: f64,
    pub langevin_collision_rate_per_ps: f64,
    pub barostat_frequency_steps: u32,
    pub constraint_tolerance: f64,
    pub reassign_velocities: bool,
}

/// Pre-production relaxation: minimization, optional constant-volume time,
/// constant-pressure time, and a short plain MD stretch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibrationSettings {
    pub minimization_steps: u32,
    pub nvt_length_ns: Option<f64>,
    pub npt_length_ns: f64,
    pub production_length_ns: f64,
}

/// Control of the multi-replica production sampler. `n_replicas` must match
/// the lambda schedule's window count; the validation layer checks the
/// pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiStateSettings {
    pub n_replicas: usize,
    pub sampler_method: SamplerMethod,
    pub time_per_iteration_ps: f64,
    pub equilibration_length_ns: f64,
    pub production_length_ns: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquilOutputSettings {
    pub nvt_structure: Option<String>,
    pub npt_structure: Option<String>,
    pub production_trajectory: Option<String>,
    pub log_output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub output_filename: String,
    pub checkpoint_filename: String,
    pub checkpoint_interval_ps: f64,
}

/// The complete settings tree for a solvation campaign.
///
/// [`ProtocolSettings::default`] is the internally consistent baseline;
/// callers override individual groups with struct-update syntax rather than
/// rebuilding the tree. All fields are plain data, so an override can produce
/// an inconsistent tree; [`ProtocolSettings::validate`] is the gate that
/// every planning path runs before any unit is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSettings {
    pub protocol_repeats: usize,
    pub forcefield: ForceFieldSettings,
    pub vacuum_forcefield: ForceFieldSettings,
    pub thermo: ThermoSettings,
    pub charge: ChargeSettings,
    pub solvation: SolvationSettings,
    pub alchemical: AlchemicalSettings,
    pub lambda: LambdaSettings,
    pub engine: EngineSettings,
    pub vacuum_engine: EngineSettings,
    pub integrator: IntegratorSettings,
    pub solvent_equilibration: EquilibrationSettings,
    pub vacuum_equilibration: EquilibrationSettings,
    pub solvent_simulation: MultiStateSettings,
    pub vacuum_simulation: MultiStateSettings,
    pub solvent_equil_output: EquilOutputSettings,
    pub vacuum_equil_output: EquilOutputSettings,
    pub solvent_output: OutputSettings,
    pub vacuum_output: OutputSettings,
}

impl ProtocolSettings {
    /// Checks every intrinsic structural invariant of the tree: ranges,
    /// array shapes, and the solvation sizing exclusivity. Cross-checks
    /// against chemical states live in the validation layer, not here.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.protocol_repeats < 1 {
            return Err(ConfigurationError::InvalidParameter {
                field: "protocol_repeats",
                reason: "must be at least 1".to_string(),
            });
        }

        self.lambda.check_ranges()?;
        self.lambda.check_monotonic()?;
        self.lambda.window_count()?;

        let forcefields = [
            ("forcefield", &self.forcefield),
            ("vacuum_forcefield", &self.vacuum_forcefield),
        ];
        for (group, ff) in forcefields {
            if ff.forcefields.is_empty() {
                return Err(ConfigurationError::InvalidParameter {
                    field: "forcefields",
                    reason: format!("the {} group names no force field files", group),
                });
            }
            if ff.hydrogen_mass_amu <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "hydrogen_mass_amu",
                    reason: format!("the {} group requires a positive mass", group),
                });
            }
            if ff.nonbonded_cutoff_nm < 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "nonbonded_cutoff_nm",
                    reason: format!("the {} group has a negative cutoff", group),
                });
            }
        }

        if self.thermo.temperature_kelvin <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                field: "thermo.temperature_kelvin",
                reason: "must be positive".to_string(),
            });
        }
        if self.thermo.pressure_bar <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                field: "thermo.pressure_bar",
                reason: "must be positive".to_string(),
            });
        }
        if self.integrator.timestep_fs <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                field: "integrator.timestep_fs",
                reason: "must be positive".to_string(),
            });
        }
        if self.integrator.langevin_collision_rate_per_ps < 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                field: "integrator.langevin_collision_rate_per_ps",
                reason: "must not be negative".to_string(),
            });
        }

        self.check_solvation_sizing()?;

        let simulations = [
            ("solvent_simulation", &self.solvent_simulation),
            ("vacuum_simulation", &self.vacuum_simulation),
        ];
        for (group, sim) in simulations {
            if sim.n_replicas == 0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "n_replicas",
                    reason: format!("the {} group declares zero replicas", group),
                });
            }
            if sim.time_per_iteration_ps <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "time_per_iteration_ps",
                    reason: format!("the {} group requires a positive iteration time", group),
                });
            }
            if sim.production_length_ns <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "production_length_ns",
                    reason: format!("the {} group requires a positive production length", group),
                });
            }
        }

        let equilibrations = [
            ("solvent_equilibration", &self.solvent_equilibration),
            ("vacuum_equilibration", &self.vacuum_equilibration),
        ];
        for (group, equil) in equilibrations {
            if equil.npt_length_ns < 0.0 || equil.production_length_ns < 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    field: "npt_length_ns",
                    reason: format!("the {} group has a negative stage length", group),
                });
            }
            if equil.nvt_length_ns.is_some_and(|nvt| nvt < 0.0) {
                return Err(ConfigurationError::InvalidParameter {
                    field: "nvt_length_ns",
                    reason: format!("the {} group has a negative stage length", group),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn check_solvation_sizing(&self) -> Result<(), ConfigurationError> {
        match (
            self.solvation.solvent_padding_nm,
            self.solvation.number_of_solvent_molecules,
        ) {
            (Some(padding), None) => {
                if padding <= 0.0 {
                    return Err(ConfigurationError::InvalidParameter {
                        field: "solvation.solvent_padding_nm",
                        reason: "must be positive".to_string(),
                    });
                }
            }
            (None, Some(count)) => {
                if count == 0 {
                    return Err(ConfigurationError::InvalidParameter {
                        field: "solvation.number_of_solvent_molecules",
                        reason: "must be at least 1".to_string(),
                    });
                }
            }
            (Some(_), Some(_)) => {
                return Err(ConfigurationError::InvalidParameter {
                    field: "solvation.number_of_solvent_molecules",
                    reason: "mutually exclusive with solvent_padding_nm".to_string(),
                });
            }
            (None, None) => {
                return Err(ConfigurationError::InvalidParameter {
                    field: "solvation.solvent_padding_nm",
                    reason: "one of solvent_padding_nm or number_of_solvent_molecules must be set"
                        .to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            protocol_repeats: 3,
            forcefield: ForceFieldSettings {
                forcefields: vec!["openff-2.0.0.offxml".to_string(), "tip3p.offxml".to_string()],
                nonbonded_method: NonbondedMethod::Pme,
                nonbonded_cutoff_nm: 0.9,
                hydrogen_mass_amu: 3.0,
            },
            vacuum_forcefield: ForceFieldSettings {
                forcefields: vec!["openff-2.0.0.offxml".to_string(), "tip3p.offxml".to_string()],
                nonbonded_method: NonbondedMethod::NoCutoff,
                nonbonded_cutoff_nm: 0.9,
                hydrogen_mass_amu: 3.0,
            },
            thermo: ThermoSettings {
                temperature_kelvin: 298.15,
                pressure_bar: 1.0,
            },
            charge: ChargeSettings {
                method: PartialChargeMethod::Am1Bcc,
            },
            solvation: SolvationSettings {
                box_shape: BoxShape::Cube,
                solvent_padding_nm: Some(1.2),
                number_of_solvent_molecules: None,
                assign_solvent_charges: false,
                packing_tolerance_angstrom: 2.0,
            },
            alchemical: AlchemicalSettings {
                softcore_lj: SoftcoreLj::Gapsys,
                use_dispersion_correction: false,
                endstate_dispersion_correction: false,
                turn_off_core_unique_exceptions: false,
            },
            lambda: LambdaSettings::default(),
            engine: EngineSettings {
                compute_platform: None,
            },
            vacuum_engine: EngineSettings {
                compute_platform: None,
            },
            integrator: IntegratorSettings {
                timestep_fs: 4.0,
                langevin_collision_rate_per_ps: 1.0,
                barostat_frequency_steps: 25,
                constraint_tolerance: 1e-6,
                reassign_velocities: false,
            },
            solvent_equilibration: EquilibrationSettings {
                minimization_steps: 5000,
                nvt_length_ns: Some(0.1),
                npt_length_ns: 0.2,
                production_length_ns: 0.5,
            },
            vacuum_equilibration: EquilibrationSettings {
                minimization_steps: 5000,
                nvt_length_ns: None,
                npt_length_ns: 0.2,
                production_length_ns: 0.5,
            },
            solvent_simulation: MultiStateSettings {
                n_replicas: 14,
                sampler_method: SamplerMethod::Repex,
                time_per_iteration_ps: 2.5,
                equilibration_length_ns: 1.0,
                production_length_ns: 10.0,
            },
            vacuum_simulation: MultiStateSettings {
                n_replicas: 14,
                sampler_method: SamplerMethod::Repex,
                time_per_iteration_ps: 2.5,
                equilibration_length_ns: 0.5,
                production_length_ns: 2.0,
            },
            solvent_equil_output: EquilOutputSettings {
                nvt_structure: Some("equil_nvt.pdb".to_string()),
                npt_structure: Some("equil_npt.pdb".to_string()),
                production_trajectory: Some("production_equil.xtc".to_string()),
                log_output: "equil_simulation.log".to_string(),
            },
            vacuum_equil_output: EquilOutputSettings {
                nvt_structure: None,
                npt_structure: Some("equil_npt.pdb".to_string()),
                production_trajectory: Some("production_equil.xtc".to_string()),
                log_output: "equil_simulation.log".to_string(),
            },
            solvent_output: OutputSettings {
                output_filename: "solvent.nc".to_string(),
                checkpoint_filename: "solvent_checkpoint.nc".to_string(),
                checkpoint_interval_ps: 250.0,
            },
            vacuum_output: OutputSettings {
                output_filename: "vacuum.nc".to_string(),
                checkpoint_filename: "vacuum_checkpoint.nc".to_string(),
                checkpoint_interval_ps: 250.0,
            },
        }
    }
}
