//! Pure predicates gating task graph construction.
//!
//! Each validator inspects chemical states and settings, mutates nothing, and
//! either passes or returns a classified error. The graph builder runs all of
//! them before constructing any execution unit and aborts on the first
//! failure.

use super::error::{ConfigurationError, ValidationError};
use super::settings::{EquilibrationSettings, LambdaSettings, MultiStateSettings, NonbondedMethod};
use crate::core::models::mapping::AlchemicalComponents;
use crate::core::models::system::ChemicalSystem;

/// SMILES of the solvent species the protocol currently supports. Widening
/// support means extending this list; nothing outside this module encodes
/// the restriction.
pub const SUPPORTED_SOLVENT_SMILES: [&str; 1] = ["O"];

/// Checks that a state's solvent census is compatible with the nonbonded
/// method chosen for it.
///
/// Rules are checked in a fixed order and the first violation is reported:
/// a solvated state with the cutoff-free method, a vacuum state with the
/// lattice-sum method, more than one solvent component, an unsupported
/// solvent species.
///
/// # Errors
///
/// Returns the [`ValidationError`] matching the first violated rule.
pub fn validate_solvent_compatibility(
    state: &ChemicalSystem,
    nonbonded_method: NonbondedMethod,
) -> Result<(), ValidationError> {
    let solvents = state.solvents();

    if !solvents.is_empty() && nonbonded_method == NonbondedMethod::NoCutoff {
        return Err(ValidationError::SolvatedStateWithoutCutoff {
            method: nonbonded_method,
        });
    }
    if solvents.is_empty() && nonbonded_method == NonbondedMethod::Pme {
        return Err(ValidationError::VacuumStateWithLatticeSum {
            method: nonbonded_method,
        });
    }
    if solvents.len() > 1 {
        return Err(ValidationError::MultipleSolvents {
            state: state.name().to_string(),
        });
    }
    if let Some((_, solvent)) = solvents.first() {
        if !SUPPORTED_SOLVENT_SMILES.contains(&solvent.smiles()) {
            return Err(ValidationError::UnsupportedSolvent {
                smiles: solvent.smiles().to_string(),
                supported: SUPPORTED_SOLVENT_SMILES.join(", "),
            });
        }
    }
    Ok(())
}

/// Checks that the component partition describes a pure decoupling: exactly
/// one component unique to state A and none unique to state B.
///
/// # Errors
///
/// Returns [`ValidationError::NotDecoupling`] with both counts otherwise.
pub fn validate_alchemical_components(
    mapping: &AlchemicalComponents,
) -> Result<(), ValidationError> {
    let unique_to_a = mapping.unique_to_a().len();
    let unique_to_b = mapping.unique_to_b().len();
    if unique_to_a != 1 || unique_to_b != 0 {
        return Err(ValidationError::NotDecoupling {
            unique_to_a,
            unique_to_b,
        });
    }
    Ok(())
}

/// Checks the lambda schedule against the simulation group it drives: arrays
/// in range, equal lengths, and a window count matching the declared replica
/// count.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] naming the offending array or the
/// mismatched counts.
pub fn validate_lambda_schedule(
    lambda: &LambdaSettings,
    simulation: &MultiStateSettings,
) -> Result<(), ConfigurationError> {
    lambda.check_ranges()?;
    let windows = lambda.window_count()?;
    if windows != simulation.n_replicas {
        return Err(ConfigurationError::ReplicaCountMismatch {
            windows,
            n_replicas: simulation.n_replicas,
        });
    }
    Ok(())
}

/// Checks the integration timestep against the stability bound implied by
/// the hydrogen mass: 2 fs below 3 amu, 4 fs at or above.
///
/// # Errors
///
/// Returns [`ValidationError::TimestepUnstable`] with the violated bound.
pub fn validate_timestep(hydrogen_mass_amu: f64, timestep_fs: f64) -> Result<(), ValidationError> {
    let max_fs = if hydrogen_mass_amu < 3.0 { 2.0 } else { 4.0 };
    if timestep_fs > max_fs {
        return Err(ValidationError::TimestepUnstable {
            timestep_fs,
            hydrogen_mass_amu,
            max_fs,
        });
    }
    Ok(())
}

/// Checks that vacuum pre-equilibration requests no constant-volume stage.
/// Vacuum has no volume coupling to equilibrate; an absent stage or an
/// explicit zero length are both acceptable.
///
/// # Errors
///
/// Returns [`ValidationError::VacuumNvtEquilibration`] with the requested
/// length.
pub fn validate_vacuum_equilibration(
    equilibration: &EquilibrationSettings,
) -> Result<(), ValidationError> {
    if let Some(nvt_length_ns) = equilibration.nvt_length_ns {
        if nvt_length_ns != 0.0 {
            return Err(ValidationError::VacuumNvtEquilibration { nvt_length_ns });
        }
    }
    Ok(())
}
