use thiserror::Error;

use super::settings::NonbondedMethod;

/// A structural settings invariant is violated: a range, an enumeration, or
/// an array shape. Raised when settings are constructed, validated, or
/// projected, always before any unit exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Parameter '{field}' is invalid: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error(
        "Lambda schedule arrays have unequal lengths: lambda_elec={elec}, lambda_vdw={vdw}, lambda_restraints={restraints}"
    )]
    ScheduleLengthMismatch {
        elec: usize,
        vdw: usize,
        restraints: usize,
    },

    #[error("Lambda schedule defines {windows} windows but the simulation declares {n_replicas} replicas")]
    ReplicaCountMismatch { windows: usize, n_replicas: usize },
}

/// A requested transformation is physically or chemically inconsistent.
/// Raised by the validation layer before graph construction; the whole build
/// aborts and no unit list is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Nonbonded method '{method}' cannot be used for a solvated state")]
    SolvatedStateWithoutCutoff { method: NonbondedMethod },

    #[error("Nonbonded method '{method}' cannot be used for a vacuum state")]
    VacuumStateWithLatticeSum { method: NonbondedMethod },

    #[error("Multiple solvent components found in state '{state}', only one is supported")]
    MultipleSolvents { state: String },

    #[error("Solvent species '{smiles}' is not supported (supported species: {supported})")]
    UnsupportedSolvent { smiles: String, supported: String },

    #[error(
        "Transformation must have exactly one component unique to state A and none unique to state B (found {unique_to_a} and {unique_to_b})"
    )]
    NotDecoupling {
        unique_to_a: usize,
        unique_to_b: usize,
    },

    #[error(
        "Timestep of {timestep_fs} fs exceeds the stability bound of {max_fs} fs for a hydrogen mass of {hydrogen_mass_amu} amu"
    )]
    TimestepUnstable {
        timestep_fs: f64,
        hydrogen_mass_amu: f64,
        max_fs: f64,
    },

    #[error("Vacuum equilibration must not include constant-volume time (got {nvt_length_ns} ns)")]
    VacuumNvtEquilibration { nvt_length_ns: f64 },
}

/// Component resolution inside a unit produced an unsupported shape despite
/// upstream validation. Fatal for that unit only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComponentResolutionError {
    #[error("Expected exactly one alchemical component, found {count}")]
    AlchemicalComponentCount { count: usize },

    #[error("Appearing components are not supported in a decoupling transformation (found {count})")]
    AppearingComponents { count: usize },

    #[error("Alchemical component '{name}' is not a small molecule")]
    NotASmallMolecule { name: String },
}

/// Failure of the planning path: settings, validation, or a feature that is
/// declared but not implemented.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Configuration error: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("Validation failed: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Feature not implemented: {feature}")]
    Unsupported { feature: &'static str },
}

/// Failure of a single execution unit. Sibling units are unaffected; the
/// failure record wrapping this error carries the identifiers an external
/// scheduler needs to resubmit just the one unit.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("Component resolution failed: {source}")]
    ComponentResolution {
        #[from]
        source: ComponentResolutionError,
    },

    #[error("Configuration error: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("Validation failed: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Failed to allocate working directories: {source}")]
    Workspace {
        #[from]
        source: std::io::Error,
    },

    #[error("Simulation backend failed: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
