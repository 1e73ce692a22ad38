//! Environment diagnostics emitted once per unit before the long-running
//! backend call. Strictly informational: nothing in here can fail the unit,
//! so every probe degrades to a log line when the information is
//! unavailable.

use std::path::Path;
use tracing::{debug, info};

/// Logs host and storage diagnostics for a unit about to run.
pub fn log_system_probe(scratch: &Path, shared: &Path) {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
    info!(
        hostname = %hostname,
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "System probe"
    );

    for (label, path) in [("scratch", scratch), ("shared", shared)] {
        match std::fs::metadata(path) {
            Ok(metadata) => debug!(
                storage = label,
                path = %path.display(),
                writable = !metadata.permissions().readonly(),
                "Storage probe"
            ),
            Err(error) => debug!(
                storage = label,
                path = %path.display(),
                %error,
                "Storage probe failed"
            ),
        }
    }
}
