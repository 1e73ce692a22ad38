use super::small_molecule::SmallMolecule;

/// A bulk solvent environment described by the chemical species that fills
/// the simulation box.
///
/// The species is identified by SMILES. An optional explicit molecule (with
/// conformer and charges) can ride along for backends that pack boxes from
/// pre-parameterized monomers; when absent, backends fall back to their own
/// representation of the species. Ion content is carried for completeness but
/// defaults to none, since charge handling is the parameterization layer's
/// concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Solvent {
    smiles: String,
    positive_ion: Option<String>,
    negative_ion: Option<String>,
    neutralize: bool,
    ion_concentration_molar: f64,
    solvent_molecule: Option<SmallMolecule>,
}

impl Solvent {
    /// Creates a solvent of the given species with no ions and no explicit
    /// monomer representation.
    pub fn from_smiles(smiles: &str) -> Self {
        Self {
            smiles: smiles.to_string(),
            positive_ion: None,
            negative_ion: None,
            neutralize: false,
            ion_concentration_molar: 0.0,
            solvent_molecule: None,
        }
    }

    /// Plain water, the baseline environment of solvation campaigns.
    pub fn water() -> Self {
        Self::from_smiles("O")
    }

    /// Attaches an explicit monomer representation of the species.
    pub fn with_molecule(mut self, molecule: SmallMolecule) -> Self {
        self.solvent_molecule = Some(molecule);
        self
    }

    /// Adds counter-ion species and a target concentration.
    pub fn with_ions(
        mut self,
        positive_ion: &str,
        negative_ion: &str,
        neutralize: bool,
        ion_concentration_molar: f64,
    ) -> Self {
        self.positive_ion = Some(positive_ion.to_string());
        self.negative_ion = Some(negative_ion.to_string());
        self.neutralize = neutralize;
        self.ion_concentration_molar = ion_concentration_molar;
        self
    }

    /// The SMILES string identifying the solvent species.
    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn positive_ion(&self) -> Option<&str> {
        self.positive_ion.as_deref()
    }

    pub fn negative_ion(&self) -> Option<&str> {
        self.negative_ion.as_deref()
    }

    pub fn neutralize(&self) -> bool {
        self.neutralize
    }

    pub fn ion_concentration_molar(&self) -> f64 {
        self.ion_concentration_molar
    }

    /// The explicit monomer representation, if one was attached.
    pub fn molecule(&self) -> Option<&SmallMolecule> {
        self.solvent_molecule.as_ref()
    }
}
