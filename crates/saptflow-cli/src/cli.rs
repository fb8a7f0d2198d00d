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
    author = "SAPTFLOW Developers",
    version,
    about = "SAPTFLOW CLI - Validate and plan SAPT(DFT) interaction-energy decompositions for two-fragment systems.",
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
    /// Validate a run file and print the SAPT(DFT) algorithm and required computations.
    Plan(PlanArgs),
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the run file in TOML format (molecule and options).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Set an option, overriding the run file. Can be used multiple times.
    /// Example: -S BASIS=jun-cc-pvdz -S SAPT.SAPT_DFT_GRAC_SHIFT_A=0.203
    #[arg(short = 'S', long = "set", value_name = "[MODULE.]KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
