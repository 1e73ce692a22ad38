use athanor::engine::settings::ProtocolSettings;
use std::path::PathBuf;

/// Everything a subcommand needs after the merge: the dataset location and
/// name, and the fully resolved, validated settings tree.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub dataset: String,
    pub settings: ProtocolSettings,
}
