use super::component::Component;
use super::system::ChemicalSystem;

/// The partition of two end states' components by value equality.
///
/// `unique_to_a` holds components present only in state A, `unique_to_b`
/// those present only in state B, and `mapped` those present in both. A
/// decoupling transformation is recognizable from the shape alone: exactly
/// one component unique to A (the disappearing solute) and none unique to B.
/// Roles play no part in the comparison; a component that moves between roles
/// without changing value is still mapped. [`Component::Absent`] placeholders
/// are ignored entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct AlchemicalComponents {
    unique_to_a: Vec<Component>,
    unique_to_b: Vec<Component>,
    mapped: Vec<Component>,
}

impl AlchemicalComponents {
    /// Partitions the components of the two end states.
    pub fn between(state_a: &ChemicalSystem, state_b: &ChemicalSystem) -> Self {
        let a_components: Vec<&Component> = state_a
            .components()
            .map(|(_, c)| c)
            .filter(|c| !c.is_absent())
            .collect();
        let b_components: Vec<&Component> = state_b
            .components()
            .map(|(_, c)| c)
            .filter(|c| !c.is_absent())
            .collect();

        let mut unique_to_a = Vec::new();
        let mut mapped = Vec::new();
        for component in &a_components {
            if b_components.contains(component) {
                mapped.push((*component).clone());
            } else {
                unique_to_a.push((*component).clone());
            }
        }

        let unique_to_b = b_components
            .iter()
            .filter(|c| !a_components.contains(c))
            .map(|c| (*c).clone())
            .collect();

        Self {
            unique_to_a,
            unique_to_b,
            mapped,
        }
    }

    pub fn unique_to_a(&self) -> &[Component] {
        &self.unique_to_a
    }

    pub fn unique_to_b(&self) -> &[Component] {
        &self.unique_to_b
    }

    pub fn mapped(&self) -> &[Component] {
        &self.mapped
    }

    /// The single disappearing component of a decoupling transformation.
    /// `None` when the partition does not have that shape; callers that need
    /// a diagnosis go through the validation layer instead.
    pub fn disappearing(&self) -> Option<&Component> {
        match self.unique_to_a.as_slice() {
            [component] if self.unique_to_b.is_empty() => Some(component),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::small_molecule::SmallMolecule;
    use crate::core::models::solvent::Solvent;

    fn benzene() -> SmallMolecule {
        SmallMolecule::new("benzene", "c1ccccc1", Vec::new())
    }

    fn decoupling_pair() -> (ChemicalSystem, ChemicalSystem) {
        let state_a = ChemicalSystem::builder("benzene in water")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();
        let state_b = state_a.without("solute");
        (state_a, state_b)
    }

    #[test]
    fn decoupling_yields_one_disappearing_component() {
        let (state_a, state_b) = decoupling_pair();
        let alchem = AlchemicalComponents::between(&state_a, &state_b);

        assert_eq!(alchem.unique_to_a().len(), 1);
        assert!(alchem.unique_to_b().is_empty());
        assert_eq!(alchem.mapped().len(), 1);

        let disappearing = alchem.disappearing().unwrap();
        assert_eq!(disappearing.display_name(), "benzene");
    }

    #[test]
    fn mapping_compares_values_not_roles() {
        let state_a = ChemicalSystem::builder("a")
            .component("ligand", Component::SmallMolecule(benzene()))
            .build();
        let state_b = ChemicalSystem::builder("b")
            .component("solute", Component::SmallMolecule(benzene()))
            .build();

        let alchem = AlchemicalComponents::between(&state_a, &state_b);
        assert!(alchem.unique_to_a().is_empty());
        assert!(alchem.unique_to_b().is_empty());
        assert_eq!(alchem.mapped().len(), 1);
    }

    #[test]
    fn absent_placeholders_do_not_participate() {
        let state_a = ChemicalSystem::builder("a")
            .solute(benzene())
            .component("solvent", Component::Absent)
            .build();
        let state_b = ChemicalSystem::builder("b")
            .component("solvent", Component::Absent)
            .build();

        let alchem = AlchemicalComponents::between(&state_a, &state_b);
        assert_eq!(alchem.unique_to_a().len(), 1);
        assert!(alchem.unique_to_b().is_empty());
        assert!(alchem.mapped().is_empty());
    }

    #[test]
    fn appearing_component_lands_in_unique_to_b() {
        let state_a = ChemicalSystem::builder("a").solvent(Solvent::water()).build();
        let state_b = ChemicalSystem::builder("b")
            .solute(benzene())
            .solvent(Solvent::water())
            .build();

        let alchem = AlchemicalComponents::between(&state_a, &state_b);
        assert!(alchem.unique_to_a().is_empty());
        assert_eq!(alchem.unique_to_b().len(), 1);
        assert!(alchem.disappearing().is_none());
    }
}
