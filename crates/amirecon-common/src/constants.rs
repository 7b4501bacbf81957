//! System-wide constants and default file names.

/// Prefix shared by every canonical parameter path (no leading slash).
pub const PARAMETER_PATH_PREFIX: &str = "aws/service/bottlerocket";

/// Parameter-store path queried for Bottlerocket parameters.
pub const SSM_QUERY_PATH: &str = "/aws/service/bottlerocket";

/// Final segment of every image-id parameter.
pub const IMAGE_ID_LEAF: &str = "image_id";

/// File name suffix of AMI manifests produced by the build pipeline.
pub const AMI_MANIFEST_SUFFIX: &str = "-amis.json";

/// Prefix of per-region parameter snapshot files.
pub const SNAPSHOT_FILE_PREFIX: &str = "ssm_cache_";

/// Default location of the object-store derived mapping.
pub const DEFAULT_MAPPING_FILE: &str = "bottlerocket_ami_ssm_mapping.json";

/// Default location of the comparison output.
pub const DEFAULT_RESULTS_FILE: &str = "comparison_results.json";

/// Default location of the version-filtered comparison output.
pub const DEFAULT_FILTERED_FILE: &str = "filtered_comparison_results.json";

/// Default directory holding parameter snapshots.
pub const DEFAULT_CACHE_DIR: &str = ".";

/// Default minimum release kept by the version filter.
pub const DEFAULT_MIN_VERSION: &str = "1.14.3";

/// Name of the `aws` command line program.
pub const AWS_CLI_PROGRAM: &str = "aws";

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "AMIRECON_CONFIG";

/// Key prefix below which build artifacts are listed in the build bucket.
pub const DEFAULT_BUCKET_PREFIX: &str = "builds/";
