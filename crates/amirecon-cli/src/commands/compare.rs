//! `amirecon compare` — Compare the mapping with published SSM parameters.

use std::path::PathBuf;

use amirecon_common::config::ReconConfig;
use amirecon_common::constants::AWS_CLI_PROGRAM;
use amirecon_common::types::Region;
use amirecon_core::reconcile::reconcile;
use amirecon_sources::snapshot::SnapshotCache;
use amirecon_sources::ssm::{AwsCliSource, CachedSource};
use amirecon_sources::store;
use anyhow::Context;
use clap::Args;

use crate::output;

/// Arguments for the `compare` command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Mapping file built from AMI manifests.
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Regions to process (default: every region in the mapping).
    #[arg(long, num_args = 1..)]
    pub regions: Vec<String>,

    /// Refetch parameters even when a cached snapshot exists.
    #[arg(long)]
    pub no_cache: bool,

    /// Directory holding parameter snapshots.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Comparison file to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `compare` command.
///
/// Loads the mapping, fetches (or reuses) the parameters of each region,
/// writes the comparison, and prints overall and per-region summaries.
///
/// # Errors
///
/// Returns an error if the mapping is missing or empty, parameters cannot
/// be fetched, or the comparison cannot be written.
pub fn execute(args: CompareArgs, config: &ReconConfig) -> anyhow::Result<()> {
    let mapping_file = args.mapping.unwrap_or_else(|| config.mapping_file.clone());
    let output_file = args.output.unwrap_or_else(|| config.results_file.clone());
    let cache_dir = args.cache_dir.unwrap_or_else(|| config.cache_dir.clone());
    let use_cache = config.use_cache && !args.no_cache;
    let regions: Vec<Region> = if args.regions.is_empty() {
        config.regions.iter().map(|r| Region::new(r.as_str())).collect()
    } else {
        args.regions.into_iter().map(Region::new).collect()
    };

    let s3 = store::load_mapping(&mapping_file)
        .with_context(|| format!("loading mapping from {}", mapping_file.display()))?;
    if s3.region_count() == 0 {
        anyhow::bail!("mapping {} holds no regions", mapping_file.display());
    }
    println!("Loaded data for {} regions from {}", s3.region_count(), mapping_file.display());

    let aws = AwsCliSource::locate(config.parameter_prefix.as_str()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "aws CLI not found on PATH, relying on cached snapshots");
        AwsCliSource::with_program(AWS_CLI_PROGRAM, config.parameter_prefix.as_str())
    });
    let source = CachedSource::new(aws, SnapshotCache::new(cache_dir), use_cache);

    let report = reconcile(&s3, &source, &regions)?;
    store::write_json(&output_file, &report)
        .with_context(|| format!("writing comparison to {}", output_file.display()))?;

    println!();
    for line in output::summary_lines(&report.summary) {
        println!("{line}");
    }
    println!();
    println!("Region-specific summaries:");
    for (region, comparison) in &report.by_region {
        println!();
        for line in output::region_lines(region, comparison)? {
            println!("{line}");
        }
    }
    println!();
    println!("Detailed comparison results written to {}", output_file.display());
    Ok(())
}
