use crate::core::models::mapping::AlchemicalComponents;
use crate::core::models::system::ChemicalSystem;
use crate::engine::backend::SimulationBackend;
use crate::engine::context::WorkspaceAllocator;
use crate::engine::error::{ProtocolError, UnitError};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::protocol::SolvationProtocol;
use crate::engine::result::{UnitFailure, UnitResult};
use crate::engine::settings::ProtocolSettings;
use crate::engine::unit::{ExecutionUnit, Phase};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The partitioned outcome of running a task graph: every unit lands in
/// exactly one of the two lists. A failure never blocks sibling units, so
/// both lists can be non-empty at once.
#[derive(Debug, Default)]
pub struct TransformationOutcome {
    pub completed: Vec<UnitResult>,
    pub failed: Vec<UnitFailure>,
}

impl TransformationOutcome {
    /// The completed records of one leg, in completion order.
    pub fn phase_results(&self, phase: Phase) -> Vec<&UnitResult> {
        self.completed
            .iter()
            .filter(|record| record.phase == phase)
            .collect()
    }

    /// Whether a free-energy difference can be estimated from this outcome:
    /// at least one completed repeat in each leg.
    pub fn is_estimable(&self) -> bool {
        [Phase::Solvent, Phase::Vacuum]
            .into_iter()
            .all(|phase| self.completed.iter().any(|record| record.phase == phase))
    }
}

/// Plans one absolute solvation transformation in a single call: freezes the
/// settings, derives the alchemical mapping between the two end states, and
/// builds the task graph.
///
/// # Errors
///
/// Returns a [`ProtocolError`] if the settings tree is structurally invalid
/// or the transformation fails validation; no units are produced.
#[instrument(skip_all, name = "solvation_planning")]
pub fn plan(
    state_a: ChemicalSystem,
    state_b: ChemicalSystem,
    settings: ProtocolSettings,
    reporter: &ProgressReporter,
) -> Result<Vec<ExecutionUnit>, ProtocolError> {
    reporter.report(Progress::StageStart { name: "Planning" });
    info!(
        state_a = state_a.name(),
        state_b = state_b.name(),
        "Planning solvation transformation."
    );

    let protocol = SolvationProtocol::new(settings)?;
    let mapping = AlchemicalComponents::between(&state_a, &state_b);
    let units = protocol.create(state_a, state_b, mapping, None)?;

    reporter.report(Progress::StageFinish);
    Ok(units)
}

/// Runs every unit of a task graph against the backend and partitions the
/// outcomes. Units execute serially, or across a thread pool when the
/// `parallel` feature is enabled; either way no unit's failure stops its
/// siblings, and the returned outcome is complete.
#[instrument(skip_all, name = "solvation_execution")]
pub fn execute(
    units: &[ExecutionUnit],
    allocator: &WorkspaceAllocator,
    backend: &dyn SimulationBackend,
    reporter: &ProgressReporter,
) -> TransformationOutcome {
    reporter.report(Progress::StageStart { name: "Execution" });

    if units.is_empty() {
        warn!("Task graph is empty, nothing to execute.");
        reporter.report(Progress::StageFinish);
        return TransformationOutcome::default();
    }

    info!(units = units.len(), "Starting execution of the task graph.");
    reporter.report(Progress::UnitsStart {
        total: units.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = units.iter();

    #[cfg(feature = "parallel")]
    let iterator = units.par_iter();

    let runs: Vec<Result<UnitResult, UnitFailure>> = iterator
        .map(|unit| run_unit(unit, allocator, backend, reporter))
        .collect();

    reporter.report(Progress::UnitsFinish);

    let mut outcome = TransformationOutcome::default();
    for run in runs {
        match run {
            Ok(record) => outcome.completed.push(record),
            Err(failure) => {
                warn!(%failure, "Execution unit failed.");
                outcome.failed.push(failure);
            }
        }
    }

    info!(
        completed = outcome.completed.len(),
        failed = outcome.failed.len(),
        estimable = outcome.is_estimable(),
        "Task graph execution finished."
    );
    reporter.report(Progress::Message(format!(
        "{} of {} units completed.",
        outcome.completed.len(),
        units.len()
    )));
    reporter.report(Progress::StageFinish);
    outcome
}

fn run_unit(
    unit: &ExecutionUnit,
    allocator: &WorkspaceAllocator,
    backend: &dyn SimulationBackend,
    reporter: &ProgressReporter,
) -> Result<UnitResult, UnitFailure> {
    let run = allocate_and_execute(unit, allocator, backend);
    reporter.report(Progress::UnitFinished {
        label: unit.label().to_string(),
        failed: run.is_err(),
    });
    run.map_err(|error| UnitFailure {
        repeat_id: unit.repeat_id(),
        generation: unit.generation(),
        phase: unit.phase(),
        error,
    })
}

fn allocate_and_execute(
    unit: &ExecutionUnit,
    allocator: &WorkspaceAllocator,
    backend: &dyn SimulationBackend,
) -> Result<UnitResult, UnitError> {
    let context = allocator.allocate(
        &unit.phase().to_string(),
        &unit.repeat_id().to_string(),
        unit.generation(),
    )?;
    unit.execute(&context, backend)
}
