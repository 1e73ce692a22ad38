use std::io;
use std::path::{Path, PathBuf};

/// Storage locations handed to one execution unit: a scratch directory for
/// intermediate files and a shared directory for outputs that outlive the
/// run. Both are exclusive to the unit for writes; read-only inputs live
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    scratch: PathBuf,
    shared: PathBuf,
}

impl ExecutionContext {
    pub fn new(scratch: PathBuf, shared: PathBuf) -> Self {
        Self { scratch, shared }
    }

    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    pub fn shared(&self) -> &Path {
        &self.shared
    }
}

/// Carves unit-exclusive directories out of a pair of root directories.
///
/// Each unit gets `<root>/<phase>_<repeat_id>_gen<generation>` under both
/// roots. Repeat identifiers are unique per graph, so no two units of a run
/// ever share a write path; re-running the same unit reuses its directories.
#[derive(Debug, Clone)]
pub struct WorkspaceAllocator {
    scratch_root: PathBuf,
    shared_root: PathBuf,
}

impl WorkspaceAllocator {
    pub fn new(scratch_root: PathBuf, shared_root: PathBuf) -> Self {
        Self {
            scratch_root,
            shared_root,
        }
    }

    /// Creates both directories for the named unit slot and returns the
    /// context pointing at them.
    pub fn allocate(
        &self,
        phase: &str,
        repeat_id: &str,
        generation: u32,
    ) -> io::Result<ExecutionContext> {
        let slot = format!("{}_{}_gen{}", phase, repeat_id, generation);
        let scratch = self.scratch_root.join(&slot);
        let shared = self.shared_root.join(&slot);
        std::fs::create_dir_all(&scratch)?;
        std::fs::create_dir_all(&shared)?;
        Ok(ExecutionContext::new(scratch, shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn allocate_creates_distinct_slots_per_unit() {
        let scratch_root = tempdir().unwrap();
        let shared_root = tempdir().unwrap();
        let allocator = WorkspaceAllocator::new(
            scratch_root.path().to_path_buf(),
            shared_root.path().to_path_buf(),
        );

        let first = allocator.allocate("solvent", "00ab", 0).unwrap();
        let second = allocator.allocate("vacuum", "00ab", 0).unwrap();

        assert!(first.scratch().is_dir());
        assert!(first.shared().is_dir());
        assert_ne!(first.scratch(), second.scratch());
        assert_ne!(first.shared(), second.shared());
    }

    #[test]
    fn allocate_is_idempotent_for_the_same_slot() {
        let scratch_root = tempdir().unwrap();
        let shared_root = tempdir().unwrap();
        let allocator = WorkspaceAllocator::new(
            scratch_root.path().to_path_buf(),
            shared_root.path().to_path_buf(),
        );

        let first = allocator.allocate("solvent", "00ab", 0).unwrap();
        let again = allocator.allocate("solvent", "00ab", 0).unwrap();
        assert_eq!(first, again);
    }
}
