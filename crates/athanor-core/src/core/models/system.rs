use std::collections::BTreeMap;

use super::component::Component;
use super::protein::Protein;
use super::small_molecule::SmallMolecule;
use super::solvent::Solvent;

/// A named end state of a transformation: a set of components keyed by role.
///
/// Roles are free-form strings ("solute", "solvent", ...) and are unique
/// within a system; the ordered map makes iteration deterministic so that
/// derived artifacts (labels, plan listings, component partitions) come out
/// identical across runs. Systems are values: every derivation such as
/// [`ChemicalSystem::without`] builds a new system and leaves the original
/// untouched.
///
/// Constructing a system performs no chemistry checks. States that no
/// protocol can simulate (two solvents, a protein, a missing solute) are
/// representable here and rejected later by the validation layer, which can
/// name the offending role in its diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalSystem {
    name: String,
    components: BTreeMap<String, Component>,
}

impl ChemicalSystem {
    /// Starts building a system with the given name.
    pub fn builder(name: &str) -> ChemicalSystemBuilder {
        ChemicalSystemBuilder {
            name: name.to_string(),
            components: BTreeMap::new(),
        }
    }

    /// The campaign-facing name of this end state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The component occupying `role`, if the role exists.
    pub fn component(&self, role: &str) -> Option<&Component> {
        self.components.get(role)
    }

    /// All (role, component) pairs in role order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.components.iter().map(|(role, c)| (role.as_str(), c))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// All solvent components, in role order. [`Component::Absent`] entries
    /// never appear here.
    pub fn solvents(&self) -> Vec<(&str, &Solvent)> {
        self.components()
            .filter_map(|(role, c)| c.as_solvent().map(|s| (role, s)))
            .collect()
    }

    /// The solvent component, when exactly one is present.
    pub fn solvent(&self) -> Option<&Solvent> {
        let solvents = self.solvents();
        match solvents.as_slice() {
            [(_, solvent)] => Some(solvent),
            _ => None,
        }
    }

    /// All small-molecule components, in role order.
    pub fn small_molecules(&self) -> Vec<(&str, &SmallMolecule)> {
        self.components()
            .filter_map(|(role, c)| c.as_small_molecule().map(|m| (role, m)))
            .collect()
    }

    /// The first protein component, if any.
    pub fn protein(&self) -> Option<&Protein> {
        self.components()
            .find_map(|(_, c)| c.as_protein())
    }

    /// Whether this state has no solvent component, i.e. describes a gas
    /// phase simulation.
    pub fn is_vacuum(&self) -> bool {
        self.solvents().is_empty()
    }

    /// A copy of this system with `role` removed. Removing a role that does
    /// not exist yields an identical copy.
    pub fn without(&self, role: &str) -> ChemicalSystem {
        let mut components = self.components.clone();
        components.remove(role);
        ChemicalSystem {
            name: self.name.clone(),
            components,
        }
    }
}

/// Builder for [`ChemicalSystem`]. Re-using a role replaces the previous
/// component.
#[derive(Debug, Clone)]
pub struct ChemicalSystemBuilder {
    name: String,
    components: BTreeMap<String, Component>,
}

impl ChemicalSystemBuilder {
    pub fn component(mut self, role: &str, component: Component) -> Self {
        self.components.insert(role.to_string(), component);
        self
    }

    pub fn solute(self, molecule: SmallMolecule) -> Self {
        self.component("solute", Component::SmallMolecule(molecule))
    }

    pub fn solvent(self, solvent: Solvent) -> Self {
        self.component("solvent", Component::Solvent(solvent))
    }

    pub fn build(self) -> ChemicalSystem {
        ChemicalSystem {
            name: self.name,
            components: self.components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benzene() -> SmallMolecule {
        SmallMolecule::new("benzene", "c1ccccc1", Vec::new())
    }

    #[test]
    fn builder_assembles_roles_in_order() {
        let system = ChemicalSystem::builder("benzene in water")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();

        assert_eq!(system.name(), "benzene in water");
        assert_eq!(system.component_count(), 2);
        let roles: Vec<&str> = system.components().map(|(role, _)| role).collect();
        assert_eq!(roles, vec!["solute", "solvent"]);
    }

    #[test]
    fn without_produces_an_independent_copy() {
        let solvated = ChemicalSystem::builder("benzene in water")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();

        let stripped = solvated.without("solute");
        assert_eq!(stripped.component_count(), 1);
        assert!(stripped.component("solute").is_none());
        assert_eq!(solvated.component_count(), 2);
    }

    #[test]
    fn vacuum_means_no_solvent_component() {
        let gas = ChemicalSystem::builder("benzene in vacuum")
            .solute(benzene())
            .build();
        assert!(gas.is_vacuum());

        let placeholder = ChemicalSystem::builder("placeholder state")
            .solute(benzene())
            .component("solvent", Component::Absent)
            .build();
        assert!(placeholder.is_vacuum());
    }

    #[test]
    fn two_solvent_states_are_representable() {
        let mixed = ChemicalSystem::builder("mixed solvents")
            .solute(benzene())
            .component("solvent", Component::Solvent(Solvent::water()))
            .component("cosolvent", Component::Solvent(Solvent::from_smiles("CCO")))
            .build();

        assert_eq!(mixed.solvents().len(), 2);
        assert!(mixed.solvent().is_none());
    }

    #[test]
    fn duplicate_role_replaces_previous_component() {
        let system = ChemicalSystem::builder("swap")
            .solvent(Solvent::water())
            .solvent(Solvent::from_smiles("CCO"))
            .build();

        let solvent = system.solvent().unwrap();
        assert_eq!(solvent.smiles(), "CCO");
    }
}
