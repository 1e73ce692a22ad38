use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::error::{ConfigurationError, ProtocolError, ValidationError};
use super::result::UnitResult;
use super::settings::{NonbondedMethod, ProtocolSettings};
use super::unit::{ExecutionUnit, Phase, RepeatId};
use super::validation::{
    validate_alchemical_components, validate_lambda_schedule, validate_solvent_compatibility,
    validate_timestep, validate_vacuum_equilibration,
};
use crate::core::models::mapping::AlchemicalComponents;
use crate::core::models::system::ChemicalSystem;

/// The absolute solvation protocol: turns a pair of end states into an
/// ordered set of independent execution units, two legs times
/// `protocol_repeats` repeats.
///
/// Settings are frozen behind shared ownership at construction; every unit
/// of every graph built from this protocol references the same immutable
/// tree, and nothing after construction can change it.
#[derive(Debug, Clone)]
pub struct SolvationProtocol {
    settings: Arc<ProtocolSettings>,
}

impl SolvationProtocol {
    /// Freezes `settings` after checking its intrinsic invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the first offending field.
    pub fn new(settings: ProtocolSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        Ok(Self {
            settings: Arc::new(settings),
        })
    }

    /// The complete, internally consistent baseline configuration. Callers
    /// override groups with struct-update syntax before handing the tree to
    /// [`SolvationProtocol::new`].
    pub fn default_settings() -> ProtocolSettings {
        ProtocolSettings::default()
    }

    pub fn settings(&self) -> &Arc<ProtocolSettings> {
        &self.settings
    }

    /// Builds the task graph for one transformation.
    ///
    /// Every validator runs before any unit is constructed; the first
    /// failure aborts the build and no partial graph is returned. On success
    /// the units come back solvent leg first, then vacuum leg, each with a
    /// fresh repeat identifier and generation zero. Order matters only for
    /// deterministic listing; units are independent and may run in any order.
    ///
    /// `extends` continues a prior repeat from its result and is not yet
    /// supported: passing `Some` is rejected before anything else happens.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Unsupported`] for an extension request, or
    /// the first validation or configuration failure.
    #[instrument(skip_all, name = "create_task_graph")]
    pub fn create(
        &self,
        state_a: ChemicalSystem,
        state_b: ChemicalSystem,
        mapping: AlchemicalComponents,
        extends: Option<&UnitResult>,
    ) -> Result<Vec<ExecutionUnit>, ProtocolError> {
        if extends.is_some() {
            return Err(ProtocolError::Unsupported {
                feature: "extending a prior result",
            });
        }

        validate_solvent_compatibility(&state_a, self.settings.forcefield.nonbonded_method)?;
        if self.settings.vacuum_forcefield.nonbonded_method != NonbondedMethod::NoCutoff {
            return Err(ValidationError::VacuumStateWithLatticeSum {
                method: self.settings.vacuum_forcefield.nonbonded_method,
            }
            .into());
        }
        validate_alchemical_components(&mapping)?;
        validate_lambda_schedule(&self.settings.lambda, &self.settings.solvent_simulation)?;
        validate_lambda_schedule(&self.settings.lambda, &self.settings.vacuum_simulation)?;
        validate_timestep(
            self.settings.forcefield.hydrogen_mass_amu,
            self.settings.integrator.timestep_fs,
        )?;
        validate_timestep(
            self.settings.vacuum_forcefield.hydrogen_mass_amu,
            self.settings.integrator.timestep_fs,
        )?;
        validate_vacuum_equilibration(&self.settings.vacuum_equilibration)?;

        let Some(disappearing) = mapping.disappearing() else {
            return Err(ValidationError::NotDecoupling {
                unique_to_a: mapping.unique_to_a().len(),
                unique_to_b: mapping.unique_to_b().len(),
            }
            .into());
        };
        let alchemical_name = disappearing.display_name();

        let state_a = Arc::new(state_a);
        let state_b = Arc::new(state_b);
        let mapping = Arc::new(mapping);

        let repeats = self.settings.protocol_repeats;
        let mut units = Vec::with_capacity(2 * repeats);
        for phase in [Phase::Solvent, Phase::Vacuum] {
            for repeat in 0..repeats {
                let repeat_id = RepeatId::new();
                let label = format!(
                    "Absolute Solvation, {} {} leg: repeat {} generation 0",
                    alchemical_name, phase, repeat
                );
                debug!(%phase, repeat, %repeat_id, "Constructed execution unit");
                units.push(ExecutionUnit::new(
                    label,
                    phase,
                    repeat_id,
                    0,
                    Arc::clone(&state_a),
                    Arc::clone(&state_b),
                    Arc::clone(&mapping),
                    Arc::clone(&self.settings),
                ));
            }
        }

        info!(
            units = units.len(),
            repeats,
            alchemical = %alchemical_name,
            "Task graph constructed"
        );
        Ok(units)
    }
}
