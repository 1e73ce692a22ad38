/// A biopolymer component carried for completeness of the system model.
///
/// Solvation transformations never simulate proteins, but systems containing
/// one must still be representable so that the validation layer can reject
/// them with a precise diagnostic instead of a construction failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    name: String,
    residue_count: usize,
}

impl Protein {
    pub fn new(name: &str, residue_count: usize) -> Self {
        Self {
            name: name.to_string(),
            residue_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residue_count(&self) -> usize {
        self.residue_count
    }
}
