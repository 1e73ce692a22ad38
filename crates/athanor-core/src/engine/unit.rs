use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::backend::{PhaseRequest, SimulationBackend};
use super::context::ExecutionContext;
use super::error::{ComponentResolutionError, UnitError};
use super::probe::log_system_probe;
use super::projection::{self, PhaseSettings};
use super::result::{RunToken, UnitResult};
use super::settings::ProtocolSettings;
use super::validation::validate_timestep;
use crate::core::models::mapping::AlchemicalComponents;
use crate::core::models::protein::Protein;
use crate::core::models::small_molecule::SmallMolecule;
use crate::core::models::solvent::Solvent;
use crate::core::models::system::ChemicalSystem;

/// The simulation leg a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Solvent,
    Vacuum,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Solvent => write!(f, "solvent"),
            Phase::Vacuum => write!(f, "vacuum"),
        }
    }
}

/// Opaque identifier of one repeat. Random rather than ordinal, so repeats
/// can be added to a campaign later without colliding with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepeatId(u128);

impl RepeatId {
    pub fn new() -> Self {
        Self(rand::random())
    }
}

impl Default for RepeatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RepeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// The concrete participants of one phase simulation, resolved from the end
/// states and the component partition.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedComponents<'a> {
    pub alchemical: &'a SmallMolecule,
    pub solvent: Option<&'a Solvent>,
    pub protein: Option<&'a Protein>,
}

/// The atomic work item of a campaign: one leg, one repeat, one generation.
///
/// Units are immutable after creation and share the end states, partition,
/// and settings of their graph through reference counting; nothing a unit
/// does can affect a sibling. Executing a unit produces a result record and
/// leaves the unit itself untouched, so re-running after a failure is always
/// safe.
#[derive(Debug, Clone)]
pub struct ExecutionUnit {
    label: String,
    phase: Phase,
    repeat_id: RepeatId,
    generation: u32,
    state_a: Arc<ChemicalSystem>,
    state_b: Arc<ChemicalSystem>,
    mapping: Arc<AlchemicalComponents>,
    settings: Arc<ProtocolSettings>,
}

impl ExecutionUnit {
    pub(crate) fn new(
        label: String,
        phase: Phase,
        repeat_id: RepeatId,
        generation: u32,
        state_a: Arc<ChemicalSystem>,
        state_b: Arc<ChemicalSystem>,
        mapping: Arc<AlchemicalComponents>,
        settings: Arc<ProtocolSettings>,
    ) -> Self {
        Self {
            label,
            phase,
            repeat_id,
            generation,
            state_a,
            state_b,
            mapping,
            settings,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn repeat_id(&self) -> RepeatId {
        self.repeat_id
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn state_a(&self) -> &ChemicalSystem {
        &self.state_a
    }

    pub fn state_b(&self) -> &ChemicalSystem {
        &self.state_b
    }

    pub fn mapping(&self) -> &AlchemicalComponents {
        &self.mapping
    }

    pub fn settings(&self) -> &Arc<ProtocolSettings> {
        &self.settings
    }

    /// Resolves which components participate in this unit's simulation.
    ///
    /// The partition shape is re-checked here even though the graph builder
    /// already validated it. For a vacuum unit the solvent always resolves to
    /// `None`, whatever state A contains.
    ///
    /// # Errors
    ///
    /// Returns a [`ComponentResolutionError`] when the partition is not a
    /// single disappearing small molecule.
    pub fn resolve_components(&self) -> Result<ResolvedComponents<'_>, ComponentResolutionError> {
        let appearing = self.mapping.unique_to_b().len();
        if appearing != 0 {
            return Err(ComponentResolutionError::AppearingComponents { count: appearing });
        }

        let disappearing = self.mapping.unique_to_a();
        let component = match disappearing {
            [component] => component,
            _ => {
                return Err(ComponentResolutionError::AlchemicalComponentCount {
                    count: disappearing.len(),
                });
            }
        };
        let alchemical = component.as_small_molecule().ok_or_else(|| {
            ComponentResolutionError::NotASmallMolecule {
                name: component.display_name(),
            }
        })?;

        let solvent = match self.phase {
            Phase::Vacuum => None,
            Phase::Solvent => self
                .state_a
                .solvents()
                .first()
                .map(|(_, solvent)| *solvent),
        };

        Ok(ResolvedComponents {
            alchemical,
            solvent,
            protein: self.state_a.protein(),
        })
    }

    /// Projects this unit's phase bundle out of the shared settings tree and
    /// re-runs the timestep gate against it, one last check before the
    /// expensive call.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::Configuration`] for a projection failure and
    /// [`UnitError::Validation`] for an unstable timestep.
    pub fn phase_settings(&self) -> Result<PhaseSettings, UnitError> {
        let bundle = projection::phase_settings(&self.settings, self.phase)?;
        validate_timestep(
            bundle.forcefield.hydrogen_mass_amu,
            bundle.integrator.timestep_fs,
        )?;
        Ok(bundle)
    }

    /// Runs this unit's simulation through the backend and returns its
    /// result record.
    ///
    /// # Errors
    ///
    /// Returns a [`UnitError`] carrying the stage that failed; the unit
    /// itself is unchanged and may be re-run.
    #[instrument(skip_all, name = "execution_unit", fields(phase = %self.phase, repeat = %self.repeat_id))]
    pub fn execute(
        &self,
        context: &ExecutionContext,
        backend: &dyn SimulationBackend,
    ) -> Result<UnitResult, UnitError> {
        let resolved = self.resolve_components()?;
        let bundle = self.phase_settings()?;

        log_system_probe(context.scratch(), context.shared());
        debug!(label = %self.label, "Dispatching unit to backend");

        let request = PhaseRequest {
            settings: &bundle,
            alchemical: resolved.alchemical,
            solvent: resolved.solvent,
            protein: resolved.protein,
            scratch: context.scratch(),
            shared: context.shared(),
        };
        let outputs = backend
            .run_phase(&request)
            .map_err(|source| UnitError::Backend { source })?;

        Ok(UnitResult {
            repeat_id: self.repeat_id,
            generation: self.generation,
            phase: self.phase,
            run_token: RunToken::new(),
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::Component;
    use crate::core::models::solvent::Solvent;
    use crate::engine::backend::BackendError;
    use crate::engine::result::OutputValue;
    use crate::engine::settings::NonbondedMethod;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    struct EchoBackend;

    impl SimulationBackend for EchoBackend {
        fn run_phase(
            &self,
            request: &PhaseRequest<'_>,
        ) -> Result<BTreeMap<String, OutputValue>, BackendError> {
            let mut outputs = BTreeMap::new();
            outputs.insert(
                "simtype".to_string(),
                OutputValue::Text(request.settings.phase.to_string()),
            );
            outputs.insert(
                "nc".to_string(),
                OutputValue::Artifact(request.shared.join(&request.settings.output.output_filename)),
            );
            Ok(outputs)
        }
    }

    fn benzene() -> SmallMolecule {
        SmallMolecule::new("benzene", "c1ccccc1", Vec::new())
    }

    fn unit_for(phase: Phase) -> ExecutionUnit {
        let state_a = ChemicalSystem::builder("benzene in water")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();
        let state_b = state_a.without("solute");
        let mapping = AlchemicalComponents::between(&state_a, &state_b);
        ExecutionUnit::new(
            format!("test {} unit", phase),
            phase,
            RepeatId::new(),
            0,
            Arc::new(state_a),
            Arc::new(state_b),
            Arc::new(mapping),
            Arc::new(ProtocolSettings::default()),
        )
    }

    #[test]
    fn solvent_unit_resolves_the_water_environment() {
        let unit = unit_for(Phase::Solvent);
        let resolved = unit.resolve_components().unwrap();
        assert_eq!(resolved.alchemical.name(), "benzene");
        assert_eq!(resolved.solvent.unwrap().smiles(), "O");
        assert!(resolved.protein.is_none());
    }

    #[test]
    fn vacuum_unit_always_resolves_a_null_solvent() {
        let unit = unit_for(Phase::Vacuum);
        let resolved = unit.resolve_components().unwrap();
        assert_eq!(resolved.alchemical.name(), "benzene");
        assert!(resolved.solvent.is_none());
    }

    #[test]
    fn resolution_rejects_appearing_components() {
        let state_a = ChemicalSystem::builder("a").solvent(Solvent::water()).build();
        let state_b = ChemicalSystem::builder("b")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();
        let mapping = AlchemicalComponents::between(&state_a, &state_b);
        let unit = ExecutionUnit::new(
            "appearing".to_string(),
            Phase::Solvent,
            RepeatId::new(),
            0,
            Arc::new(state_a),
            Arc::new(state_b),
            Arc::new(mapping),
            Arc::new(ProtocolSettings::default()),
        );

        assert!(matches!(
            unit.resolve_components(),
            Err(ComponentResolutionError::AppearingComponents { count: 1 })
        ));
    }

    #[test]
    fn resolution_rejects_a_disappearing_non_molecule() {
        let state_a = ChemicalSystem::builder("a")
            .component("cofactor", Component::Protein(Protein::new("T4", 164)))
            .solvent(Solvent::water())
            .build();
        let state_b = state_a.without("cofactor");
        let mapping = AlchemicalComponents::between(&state_a, &state_b);
        let unit = ExecutionUnit::new(
            "protein".to_string(),
            Phase::Solvent,
            RepeatId::new(),
            0,
            Arc::new(state_a),
            Arc::new(state_b),
            Arc::new(mapping),
            Arc::new(ProtocolSettings::default()),
        );

        assert!(matches!(
            unit.resolve_components(),
            Err(ComponentResolutionError::NotASmallMolecule { .. })
        ));
    }

    #[test]
    fn phase_settings_projects_the_matching_bundle() {
        let solvent_bundle = unit_for(Phase::Solvent).phase_settings().unwrap();
        assert_eq!(solvent_bundle.forcefield.nonbonded_method, NonbondedMethod::Pme);

        let vacuum_bundle = unit_for(Phase::Vacuum).phase_settings().unwrap();
        assert_eq!(
            vacuum_bundle.forcefield.nonbonded_method,
            NonbondedMethod::NoCutoff
        );
    }

    #[test]
    fn phase_settings_re_runs_the_timestep_gate() {
        let mut settings = ProtocolSettings::default();
        settings.forcefield.hydrogen_mass_amu = 1.008;
        let state_a = ChemicalSystem::builder("benzene in water")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();
        let state_b = state_a.without("solute");
        let mapping = AlchemicalComponents::between(&state_a, &state_b);
        let unit = ExecutionUnit::new(
            "unstable".to_string(),
            Phase::Solvent,
            RepeatId::new(),
            0,
            Arc::new(state_a),
            Arc::new(state_b),
            Arc::new(mapping),
            Arc::new(settings),
        );

        assert!(matches!(
            unit.phase_settings(),
            Err(UnitError::Validation { .. })
        ));
    }

    #[test]
    fn execute_tags_the_record_with_unit_identity() {
        let unit = unit_for(Phase::Vacuum);
        let scratch = tempdir().unwrap();
        let shared = tempdir().unwrap();
        let context = ExecutionContext::new(
            scratch.path().to_path_buf(),
            shared.path().to_path_buf(),
        );

        let record = unit.execute(&context, &EchoBackend).unwrap();
        assert_eq!(record.repeat_id, unit.repeat_id());
        assert_eq!(record.generation, 0);
        assert_eq!(record.phase, Phase::Vacuum);
        assert_eq!(record.text("simtype"), Some("vacuum"));
        assert_eq!(
            record.artifact("nc"),
            Some(shared.path().join("vacuum.nc").as_path())
        );
    }

    #[test]
    fn re_running_a_unit_yields_distinct_run_tokens() {
        let unit = unit_for(Phase::Solvent);
        let scratch = tempdir().unwrap();
        let shared = tempdir().unwrap();
        let context = ExecutionContext::new(
            scratch.path().to_path_buf(),
            shared.path().to_path_buf(),
        );

        let first = unit.execute(&context, &EchoBackend).unwrap();
        let second = unit.execute(&context, &EchoBackend).unwrap();
        assert_ne!(first.run_token, second.run_token);
        assert_eq!(first.outputs, second.outputs);
    }
}
