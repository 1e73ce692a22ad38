use crate::cli::SettingsArgs;
use crate::config::file::FileSettings;
use crate::error::{CliError, Result};
use athanor::engine::protocol::SolvationProtocol;
use tracing::info;

pub fn run(args: SettingsArgs) -> Result<()> {
    let settings = SolvationProtocol::default_settings();
    let template = FileSettings::template(&settings);
    let text = toml::to_string_pretty(&template).map_err(|e| CliError::Other(e.into()))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            info!("Settings template written to {:?}", path);
            eprintln!("Settings template written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
