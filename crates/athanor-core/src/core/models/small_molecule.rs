use nalgebra::Point3;

/// A single atom of a small molecule: element, assigned partial charge, and
/// one conformer position.
///
/// Coordinates are in Angstroms and charges in elementary charge units, the
/// conventions of the structure files this crate ingests.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeAtom {
    /// Element symbol as written in the source file (e.g., "C", "Cl").
    pub element: String,
    /// Partial atomic charge in elementary charge units.
    pub partial_charge_e: f64,
    /// Conformer coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl MoleculeAtom {
    /// Creates an atom with the given element and position and a zero charge.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            partial_charge_e: 0.0,
            position,
        }
    }
}

/// A small organic molecule with assigned partial charges and a single
/// conformer.
///
/// This is the alchemical payload of a transformation: the solute that is
/// decoupled from its environment. The type is a value: once constructed it
/// is never mutated, and equality is structural over name, SMILES, and atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct SmallMolecule {
    name: String,
    smiles: String,
    atoms: Vec<MoleculeAtom>,
}

impl SmallMolecule {
    /// Creates a molecule from its provenance name, SMILES string, and atoms.
    pub fn new(name: &str, smiles: &str, atoms: Vec<MoleculeAtom>) -> Self {
        Self {
            name: name.to_string(),
            smiles: smiles.to_string(),
            atoms,
        }
    }

    /// The provenance name of the molecule (dataset entry title or assigned
    /// label). May be empty for anonymous entries.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The SMILES string describing the molecular species.
    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn atoms(&self) -> &[MoleculeAtom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Whether any atom carries a non-zero partial charge, i.e. whether a
    /// charge-assignment pass has touched this molecule.
    pub fn has_charges(&self) -> bool {
        self.atoms.iter().any(|a| a.partial_charge_e != 0.0)
    }

    /// Sum of partial charges in elementary charge units.
    pub fn net_charge(&self) -> f64 {
        self.atoms.iter().map(|a| a.partial_charge_e).sum()
    }

    /// Largest interatomic distance of the conformer, in Angstroms.
    ///
    /// Used as a box-sizing hint when a solvation box is specified by padding
    /// rather than by an explicit solvent count. Returns 0.0 for molecules
    /// with fewer than two atoms.
    pub fn extent_angstrom(&self) -> f64 {
        let mut max_sq: f64 = 0.0;
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                let d_sq = (a.position - b.position).norm_squared();
                if d_sq > max_sq {
                    max_sq = d_sq;
                }
            }
        }
        max_sq.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methane_like() -> SmallMolecule {
        let atoms = vec![
            MoleculeAtom {
                element: "C".to_string(),
                partial_charge_e: -0.4,
                position: Point3::new(0.0, 0.0, 0.0),
            },
            MoleculeAtom {
                element: "H".to_string(),
                partial_charge_e: 0.1,
                position: Point3::new(1.0, 0.0, 0.0),
            },
            MoleculeAtom {
                element: "H".to_string(),
                partial_charge_e: 0.1,
                position: Point3::new(-1.0, 0.0, 0.0),
            },
            MoleculeAtom {
                element: "H".to_string(),
                partial_charge_e: 0.1,
                position: Point3::new(0.0, 1.0, 0.0),
            },
            MoleculeAtom {
                element: "H".to_string(),
                partial_charge_e: 0.1,
                position: Point3::new(0.0, -1.0, 0.0),
            },
        ];
        SmallMolecule::new("methane", "C", atoms)
    }

    #[test]
    fn net_charge_sums_partial_charges() {
        let mol = methane_like();
        assert!((mol.net_charge() - 0.0).abs() < 1e-12);
        assert!(mol.has_charges());
    }

    #[test]
    fn extent_is_largest_interatomic_distance() {
        let mol = methane_like();
        assert!((mol.extent_angstrom() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn extent_of_single_atom_is_zero() {
        let mol = SmallMolecule::new(
            "helium",
            "[He]",
            vec![MoleculeAtom::new("He", Point3::origin())],
        );
        assert_eq!(mol.extent_angstrom(), 0.0);
        assert!(!mol.has_charges());
    }
}
