//! CLI command definitions and dispatch.

pub mod build_mapping;
pub mod compare;
pub mod filter;
pub mod translate;

use std::path::PathBuf;

use amirecon_common::config::ReconConfig;
use amirecon_common::constants::CONFIG_ENV_VAR;
use clap::{Parser, Subcommand, ValueEnum};

/// amirecon — Reconcile Bottlerocket AMI builds with published SSM parameters.
#[derive(Parser, Debug)]
#[command(name = "amirecon", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the parameter paths an image name translates to.
    Translate(translate::TranslateArgs),
    /// Build the parameter mapping from AMI manifests.
    BuildMapping(build_mapping::BuildMappingArgs),
    /// Compare the mapping with published SSM parameters.
    Compare(compare::CompareArgs),
    /// Keep only comparison entries at or above a release.
    Filter(filter::FilterArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the command
/// fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = ReconConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Translate(args) => translate::execute(&args),
        Command::BuildMapping(args) => build_mapping::execute(args, &config),
        Command::Compare(args) => compare::execute(args, &config),
        Command::Filter(args) => filter::execute(args, &config),
    }
}
