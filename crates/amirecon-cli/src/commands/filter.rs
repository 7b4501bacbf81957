//! `amirecon filter` — Keep only comparison entries at or above a release.

use std::path::PathBuf;

use amirecon_common::config::ReconConfig;
use amirecon_core::gate::VersionGate;
use amirecon_sources::store;
use anyhow::Context;
use clap::Args;
use serde_json::Value;

/// Arguments for the `filter` command.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Comparison file to read.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Filtered comparison file to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum release to keep, e.g. `1.14.3`.
    #[arg(long)]
    pub min_version: Option<String>,
}

/// Executes the `filter` command.
///
/// # Errors
///
/// Returns an error if the threshold is not a release, the input cannot be
/// read or is not a JSON object or array, or the output cannot be written.
pub fn execute(args: FilterArgs, config: &ReconConfig) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| config.results_file.clone());
    let output = args.output.unwrap_or_else(|| config.filtered_file.clone());
    let min_version = args.min_version.unwrap_or_else(|| config.min_version.clone());

    let gate = VersionGate::from_threshold(&min_version)?;
    let tree: Value = store::read_json(&input)
        .with_context(|| format!("reading comparison from {}", input.display()))?;
    let filtered = gate
        .filter(&tree)
        .with_context(|| format!("filtering {}", input.display()))?;
    store::write_json(&output, &filtered)
        .with_context(|| format!("writing filtered comparison to {}", output.display()))?;

    tracing::info!(min_version = %gate.min_version(), "filtered comparison");
    println!("Filtered results have been saved to {}", output.display());
    Ok(())
}
