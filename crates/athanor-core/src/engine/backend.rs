//! The seam to the molecular-dynamics collaborator.
//!
//! Everything expensive lives behind [`SimulationBackend`]: parameterization,
//! box packing, equilibration, and multi-replica production are one opaque
//! call from the engine's point of view. The core hands over resolved
//! components and a phase bundle and gets back named outputs; it never learns
//! how the simulation was run.

use std::collections::BTreeMap;
use std::path::Path;

use super::projection::PhaseSettings;
use super::result::OutputValue;
use crate::core::models::protein::Protein;
use crate::core::models::small_molecule::SmallMolecule;
use crate::core::models::solvent::Solvent;

/// Any error a backend implementation chooses to surface. The engine records
/// it against the one unit that was running and leaves sibling units alone.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// One phase simulation, fully specified. `solvent` is `None` exactly when
/// the bundle describes the vacuum leg; a backend cannot be asked to pack a
/// box it was not given a solvent for.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRequest<'a> {
    pub settings: &'a PhaseSettings,
    pub alchemical: &'a SmallMolecule,
    pub solvent: Option<&'a Solvent>,
    pub protein: Option<&'a Protein>,
    pub scratch: &'a Path,
    pub shared: &'a Path,
}

/// The molecular-dynamics collaborator.
///
/// Implementations must be phase-agnostic: the same object serves solvent and
/// vacuum requests, distinguished only by the request contents. Given a fixed
/// seed the run is expected to be deterministic; the engine relies on that
/// only in the weak sense that re-running a unit is safe.
pub trait SimulationBackend: Send + Sync {
    /// Runs one phase simulation and returns its named outputs.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying engine, reported as-is.
    fn run_phase(
        &self,
        request: &PhaseRequest<'_>,
    ) -> Result<BTreeMap<String, OutputValue>, BackendError>;
}
