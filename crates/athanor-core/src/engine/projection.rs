//! Projects the full settings tree onto a single phase.
//!
//! Units never read [`ProtocolSettings`] directly; they receive the flat
//! bundle produced here, which contains exactly the sub-settings their phase
//! needs and nothing that belongs to the other leg.

use super::error::ConfigurationError;
use super::settings::{
    AlchemicalSettings, ChargeSettings, EngineSettings, EquilOutputSettings,
    EquilibrationSettings, ForceFieldSettings, IntegratorSettings, LambdaSettings,
    MultiStateSettings, OutputSettings, ProtocolSettings, SolvationSettings, ThermoSettings,
};
use super::unit::Phase;

/// The flat per-phase settings bundle consumed by execution units and the
/// simulation backend. `solvation` is populated only for the condensed
/// phase; a vacuum bundle cannot request packing by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSettings {
    pub phase: Phase,
    pub forcefield: ForceFieldSettings,
    pub thermo: ThermoSettings,
    pub charge: ChargeSettings,
    pub solvation: Option<SolvationSettings>,
    pub alchemical: AlchemicalSettings,
    pub lambda: LambdaSettings,
    pub engine: EngineSettings,
    pub integrator: IntegratorSettings,
    pub equilibration: EquilibrationSettings,
    pub equil_output: EquilOutputSettings,
    pub simulation: MultiStateSettings,
    pub output: OutputSettings,
}

/// Builds the bundle for `phase`. Total for both phases: every field the
/// backend needs is either populated or, for the condensed phase's box
/// sizing, re-checked so that an unsizable request is rejected here rather
/// than silently defaulted.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the condensed phase has no usable
/// box sizing.
pub fn phase_settings(
    settings: &ProtocolSettings,
    phase: Phase,
) -> Result<PhaseSettings, ConfigurationError> {
    match phase {
        Phase::Solvent => {
            settings.check_solvation_sizing()?;
            Ok(PhaseSettings {
                phase,
                forcefield: settings.forcefield.clone(),
                thermo: settings.thermo,
                charge: settings.charge,
                solvation: Some(settings.solvation.clone()),
                alchemical: settings.alchemical,
                lambda: settings.lambda.clone(),
                engine: settings.engine.clone(),
                integrator: settings.integrator,
                equilibration: settings.solvent_equilibration,
                equil_output: settings.solvent_equil_output.clone(),
                simulation: settings.solvent_simulation,
                output: settings.solvent_output.clone(),
            })
        }
        Phase::Vacuum => Ok(PhaseSettings {
            phase,
            forcefield: settings.vacuum_forcefield.clone(),
            thermo: settings.thermo,
            charge: settings.charge,
            solvation: None,
            alchemical: settings.alchemical,
            lambda: settings.lambda.clone(),
            engine: settings.vacuum_engine.clone(),
            integrator: settings.integrator,
            equilibration: settings.vacuum_equilibration,
            equil_output: settings.vacuum_equil_output.clone(),
            simulation: settings.vacuum_simulation,
            output: settings.vacuum_output.clone(),
        }),
    }
}
