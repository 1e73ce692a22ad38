use super::protein::Protein;
use super::small_molecule::SmallMolecule;
use super::solvent::Solvent;

/// A chemical building block that can occupy a role in a [`super::system::ChemicalSystem`].
///
/// The set of kinds is closed on purpose: every layer that inspects systems
/// (validation, projection, unit construction) matches exhaustively on this
/// enum, so adding a kind forces every such site to take a position on it.
/// [`Component::Absent`] is an explicit placeholder for roles that exist in a
/// system's vocabulary but are empty in a particular state; it never counts
/// toward solvent or solute census.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    SmallMolecule(SmallMolecule),
    Solvent(Solvent),
    Protein(Protein),
    Absent,
}

impl Component {
    /// A short human-readable identifier used in unit labels and diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            Component::SmallMolecule(mol) => {
                if mol.name().is_empty() {
                    mol.smiles().to_string()
                } else {
                    mol.name().to_string()
                }
            }
            Component::Solvent(solvent) => format!("solvent ({})", solvent.smiles()),
            Component::Protein(protein) => protein.name().to_string(),
            Component::Absent => "absent".to_string(),
        }
    }

    pub fn as_small_molecule(&self) -> Option<&SmallMolecule> {
        match self {
            Component::SmallMolecule(mol) => Some(mol),
            _ => None,
        }
    }

    pub fn as_solvent(&self) -> Option<&Solvent> {
        match self {
            Component::Solvent(solvent) => Some(solvent),
            _ => None,
        }
    }

    pub fn as_protein(&self) -> Option<&Protein> {
        match self {
            Component::Protein(protein) => Some(protein),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Component::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_smiles_for_anonymous_molecules() {
        let anonymous = Component::SmallMolecule(SmallMolecule::new("", "c1ccccc1", Vec::new()));
        assert_eq!(anonymous.display_name(), "c1ccccc1");

        let named = Component::SmallMolecule(SmallMolecule::new("benzene", "c1ccccc1", Vec::new()));
        assert_eq!(named.display_name(), "benzene");
    }

    #[test]
    fn accessors_are_kind_selective() {
        let solvent = Component::Solvent(Solvent::water());
        assert!(solvent.as_solvent().is_some());
        assert!(solvent.as_small_molecule().is_none());
        assert!(!solvent.is_absent());
        assert!(Component::Absent.is_absent());
    }
}
