//! `amirecon build-mapping` — Build the parameter mapping from AMI manifests.

use std::path::PathBuf;

use amirecon_common::config::ReconConfig;
use amirecon_common::constants::DEFAULT_BUCKET_PREFIX;
use amirecon_sources::manifest::{self, LocalManifests, ManifestStore};
use amirecon_sources::s3::S3Manifests;
use amirecon_sources::store;
use anyhow::Context;
use clap::Args;

/// Arguments for the `build-mapping` command.
#[derive(Args, Debug)]
pub struct BuildMappingArgs {
    /// Directory holding `*-amis.json` manifests (searched recursively).
    #[arg(long, required_unless_present = "bucket", conflicts_with = "bucket")]
    pub manifests: Option<PathBuf>,

    /// Build bucket to list manifests from with the `aws` CLI.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix listed in the build bucket.
    #[arg(long, default_value = DEFAULT_BUCKET_PREFIX)]
    pub prefix: String,

    /// Mapping file to write (defaults to the configured mapping file).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `build-mapping` command.
///
/// # Errors
///
/// Returns an error if the manifests cannot be listed or the mapping cannot
/// be written.
pub fn execute(args: BuildMappingArgs, config: &ReconConfig) -> anyhow::Result<()> {
    let output = args.output.unwrap_or_else(|| config.mapping_file.clone());

    let source = (args.manifests, args.bucket);
    let (manifests, origin): (Box<dyn ManifestStore>, String) = match source {
        (Some(dir), _) => {
            let origin = dir.display().to_string();
            (Box::new(LocalManifests::new(dir)), origin)
        }
        (None, Some(bucket)) => {
            let origin = format!("s3://{bucket}/{}", args.prefix);
            let s3 = S3Manifests::locate(bucket, args.prefix)?;
            (Box::new(s3), origin)
        }
        (None, None) => anyhow::bail!("either --manifests or --bucket is required"),
    };
    tracing::info!(manifests = %origin, "building parameter mapping");

    let mapping = manifest::build_mapping(manifests.as_ref())
        .with_context(|| format!("reading manifests under {origin}"))?;

    store::save_mapping(&output, &mapping)
        .with_context(|| format!("writing mapping to {}", output.display()))?;

    println!("Total regions: {}", mapping.region_count());
    println!("Total key-value pairs: {}", mapping.entry_count());
    println!("Mapping written to {}", output.display());
    Ok(())
}
