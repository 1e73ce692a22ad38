//! Turns structure-data files into chemical systems ready for planning.
//!
//! A dataset file holds one solute per entry, with the solvent species named
//! in a data item. Loading produces the solvated end state for each entry;
//! the decoupled end state is derived later by the planning workflow. Solvent
//! components are built through an explicit cache owned by the caller, so the
//! same species is constructed once per ingestion run and nothing persists
//! beyond the cache's lifetime.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::core::io::sdf::{SdfEntry, SdfError, SdfFile};
use crate::core::models::solvent::Solvent;
use crate::core::models::system::ChemicalSystem;

/// Data item naming the solvent species of an entry, as a SMILES string.
/// Entries without it are taken to be in water.
pub const SOLVENT_PROPERTY: &str = "solvent";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open dataset file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dataset file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: SdfError,
    },
}

/// Cache of solvent components for one ingestion run.
///
/// Datasets reuse the same few species across hundreds of entries. The cache
/// is an explicit value threaded through the load calls of a run; the caller
/// decides its scope and it holds no process-wide state.
#[derive(Debug, Clone, Default)]
pub struct SolventCache {
    by_smiles: BTreeMap<String, Solvent>,
}

impl SolventCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with a pre-built solvent, keyed by its species.
    /// Subsequent resolutions of that species return this component, so a
    /// caller can supply e.g. a water model with an explicit monomer.
    pub fn insert(&mut self, solvent: Solvent) {
        self.by_smiles.insert(solvent.smiles().to_string(), solvent);
    }

    /// Returns the solvent for `smiles`, building and caching it on first
    /// sight.
    pub fn resolve(&mut self, smiles: &str) -> Solvent {
        self.by_smiles
            .entry(smiles.to_string())
            .or_insert_with(|| Solvent::from_smiles(smiles))
            .clone()
    }

    /// Number of distinct species resolved so far.
    pub fn species_count(&self) -> usize {
        self.by_smiles.len()
    }

    /// The cached species, in SMILES order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.by_smiles.keys().map(String::as_str)
    }
}

/// Loads a dataset file and builds one solvated system per entry.
///
/// Systems are named `molecule{index}_{dataset_name}` so that results from
/// different datasets stay distinguishable downstream.
///
/// # Errors
///
/// Returns [`IngestError::Open`] when the file cannot be read and
/// [`IngestError::Parse`] when its contents are not a well-formed structure
/// data file.
#[instrument(skip_all, name = "load_solvation_systems")]
pub fn load_solvation_systems(
    path: &Path,
    dataset_name: &str,
    cache: &mut SolventCache,
) -> Result<Vec<ChemicalSystem>, IngestError> {
    info!(path = %path.display(), dataset = dataset_name, "Loading solvation dataset");

    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let entries =
        SdfFile::read_from(&mut BufReader::new(file)).map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let systems = systems_from_entries(&entries, dataset_name, cache);
    info!(
        systems = systems.len(),
        solvent_species = cache.species_count(),
        "Dataset ingested"
    );
    Ok(systems)
}

/// Builds solvated systems from already parsed entries. The file-reading
/// wrapper above delegates here; callers holding entries in memory can use it
/// directly.
pub fn systems_from_entries(
    entries: &[SdfEntry],
    dataset_name: &str,
    cache: &mut SolventCache,
) -> Vec<ChemicalSystem> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let solvent_smiles = entry.property(SOLVENT_PROPERTY).unwrap_or("O");
            let solvent = cache.resolve(solvent_smiles);
            let name = format!("molecule{}_{}", index, dataset_name);
            debug!(system = %name, solvent = solvent_smiles, "Ingested entry");
            ChemicalSystem::builder(&name)
                .solute(entry.to_small_molecule())
                .solvent(solvent)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DATASET: &str = "\
mol-a
  stamp
  comment
  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C
M  END
> <smiles>
C

$$$$
mol-b
  stamp
  comment
  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 O
M  END
> <solvent>
CCO

$$$$
";

    struct TestSetup {
        file: NamedTempFile,
        cache: SolventCache,
    }

    fn setup() -> TestSetup {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();
        TestSetup {
            file,
            cache: SolventCache::new(),
        }
    }

    #[test]
    fn builds_one_system_per_entry() {
        let mut s = setup();
        let systems =
            load_solvation_systems(s.file.path(), "freesolv", &mut s.cache).unwrap();

        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0].name(), "molecule0_freesolv");
        assert_eq!(systems[1].name(), "molecule1_freesolv");
        assert!(systems.iter().all(|sys| !sys.is_vacuum()));
    }

    #[test]
    fn solvent_property_overrides_the_water_default() {
        let mut s = setup();
        let systems =
            load_solvation_systems(s.file.path(), "freesolv", &mut s.cache).unwrap();

        assert_eq!(systems[0].solvent().unwrap().smiles(), "O");
        assert_eq!(systems[1].solvent().unwrap().smiles(), "CCO");
    }

    #[test]
    fn cache_resolves_each_species_once() {
        let mut s = setup();
        load_solvation_systems(s.file.path(), "run-one", &mut s.cache).unwrap();
        load_solvation_systems(s.file.path(), "run-two", &mut s.cache).unwrap();

        assert_eq!(s.cache.species_count(), 2);
        let species: Vec<&str> = s.cache.species().collect();
        assert_eq!(species, vec!["CCO", "O"]);
    }

    #[test]
    fn seeded_cache_entry_is_reused() {
        let mut cache = SolventCache::new();
        let water = Solvent::water().with_ions("Na+", "Cl-", true, 0.15);
        cache.insert(water.clone());

        assert_eq!(cache.resolve("O"), water);
        assert_eq!(cache.species_count(), 1);
    }

    #[test]
    fn missing_file_reports_open_error() {
        let mut cache = SolventCache::new();
        let result = load_solvation_systems(
            Path::new("/nonexistent/dataset.sdf"),
            "missing",
            &mut cache,
        );
        assert!(matches!(result, Err(IngestError::Open { .. })));
    }
}
