use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::UnitError;
use super::unit::{Phase, RepeatId};

/// Opaque identifier minted fresh for every run of a unit, so that records
/// from retries of the same unit stay distinguishable instead of overwriting
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunToken(u128);

impl RunToken {
    pub fn new() -> Self {
        Self(rand::random())
    }
}

impl Default for RunToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// One named output of a unit run: a number, free text, or a path to an
/// artifact the backend wrote under the shared directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputValue {
    Scalar(f64),
    Text(String),
    Artifact(PathBuf),
}

/// The output contract of one execution unit run.
///
/// Records are self-describing: the identifier triple plus the run token are
/// enough to match a record to its originating unit and attempt without
/// relying on arrival order. Downstream estimators consume the `outputs` map
/// and never look inside the unit again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitResult {
    pub repeat_id: RepeatId,
    pub generation: u32,
    pub phase: Phase,
    pub run_token: RunToken,
    pub outputs: BTreeMap<String, OutputValue>,
}

impl UnitResult {
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.outputs.get(name) {
            Some(OutputValue::Scalar(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.outputs.get(name) {
            Some(OutputValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn artifact(&self, name: &str) -> Option<&Path> {
        match self.outputs.get(name) {
            Some(OutputValue::Artifact(path)) => Some(path),
            _ => None,
        }
    }
}

/// A failed unit run, carrying the identifiers an external scheduler needs
/// to resubmit exactly this unit and nothing else.
#[derive(Debug)]
pub struct UnitFailure {
    pub repeat_id: RepeatId,
    pub generation: u32,
    pub phase: Phase,
    pub error: UnitError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} repeat {} generation {} failed: {}",
            self.phase, self.repeat_id, self.generation, self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UnitResult {
        let mut outputs = BTreeMap::new();
        outputs.insert("unit_estimate_kcal_mol".to_string(), OutputValue::Scalar(-3.2));
        outputs.insert(
            "trajectory".to_string(),
            OutputValue::Artifact(PathBuf::from("shared/solvent.nc")),
        );
        outputs.insert("simtype".to_string(), OutputValue::Text("solvent".to_string()));
        UnitResult {
            repeat_id: RepeatId::new(),
            generation: 0,
            phase: Phase::Solvent,
            run_token: RunToken::new(),
            outputs,
        }
    }

    #[test]
    fn typed_accessors_select_by_kind() {
        let record = record();
        assert_eq!(record.scalar("unit_estimate_kcal_mol"), Some(-3.2));
        assert_eq!(record.text("simtype"), Some("solvent"));
        assert_eq!(
            record.artifact("trajectory"),
            Some(Path::new("shared/solvent.nc"))
        );
        assert_eq!(record.scalar("trajectory"), None);
        assert_eq!(record.artifact("missing"), None);
    }

    #[test]
    fn run_tokens_distinguish_retries() {
        let first = RunToken::new();
        let second = RunToken::new();
        assert_ne!(first, second);
        assert_eq!(first.to_string().len(), 32);
    }
}
