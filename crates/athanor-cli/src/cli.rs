use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Athanor CLI - A command-line interface for planning and validating alchemical absolute solvation free-energy campaigns.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every transformation in a dataset against the protocol settings.
    Check(CheckArgs),
    /// Build the task graph for a dataset and print or export the unit listing.
    Plan(PlanArgs),
    /// Print the default protocol settings as a TOML template.
    Settings(SettingsArgs),
}

/// Input selection shared by the `check` and `plan` subcommands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the input dataset in SDF format, one solute per record.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the protocol settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name used for the dataset when labelling systems.
    /// Defaults to the input file stem.
    #[arg(short, long, value_name = "NAME")]
    pub dataset: Option<String>,
}

/// Settings overrides shared by the `check` and `plan` subcommands.
/// Each one takes precedence over both the settings file and the defaults.
#[derive(Args, Debug, Clone)]
pub struct SettingsOverrides {
    /// Override the number of independent repeats per leg.
    #[arg(long, value_name = "INT")]
    pub repeats: Option<usize>,

    /// Override the solvent box padding in nanometers.
    #[arg(long, value_name = "FLOAT")]
    pub padding_nm: Option<f64>,

    /// Override the explicit solvent molecule count, replacing padding-based
    /// box sizing.
    #[arg(long, value_name = "INT", conflicts_with = "padding_nm")]
    pub n_solvent_molecules: Option<u32>,

    /// Override the integration timestep in femtoseconds.
    #[arg(long, value_name = "FLOAT")]
    pub timestep_fs: Option<f64>,

    /// Override the hydrogen mass in atomic mass units for both legs.
    #[arg(long, value_name = "FLOAT")]
    pub hydrogen_mass_amu: Option<f64>,

    /// Override the compute platform name for both legs (e.g. 'CUDA', 'CPU').
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub overrides: SettingsOverrides,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    /// Write the plan report as JSON to this path instead of only printing
    /// the unit table.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `settings` subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Write the template to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
