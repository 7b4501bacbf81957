//! Configuration model for reconciliation runs.
//!
//! Every field has a default so a configuration file only needs to list
//! the values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{ReconError, Result};

/// Root configuration for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Mapping built from object-store manifests.
    pub mapping_file: PathBuf,
    /// Where comparison results are written.
    pub results_file: PathBuf,
    /// Where version-filtered comparison results are written.
    pub filtered_file: PathBuf,
    /// Directory holding per-region parameter snapshots.
    pub cache_dir: PathBuf,
    /// Whether existing snapshots are reused instead of refetched.
    pub use_cache: bool,
    /// Parameter-store path queried for parameters.
    pub parameter_prefix: String,
    /// Minimum release kept by the version filter.
    pub min_version: String,
    /// Regions to process; empty means every region in the mapping.
    pub regions: Vec<String>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            mapping_file: PathBuf::from(constants::DEFAULT_MAPPING_FILE),
            results_file: PathBuf::from(constants::DEFAULT_RESULTS_FILE),
            filtered_file: PathBuf::from(constants::DEFAULT_FILTERED_FILE),
            cache_dir: PathBuf::from(constants::DEFAULT_CACHE_DIR),
            use_cache: true,
            parameter_prefix: constants::SSM_QUERY_PATH.to_string(),
            min_version: constants::DEFAULT_MIN_VERSION.to_string(),
            regions: Vec::new(),
        }
    }
}

impl ReconConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration document.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| ReconError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path` if given, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is given and loading it fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    fn validate(&self) -> Result<()> {
        if self.parameter_prefix.trim().is_empty() {
            return Err(ReconError::Config {
                message: "parameter_prefix must not be empty".into(),
            });
        }
        if self.min_version.trim().is_empty() {
            return Err(ReconError::Config {
                message: "min_version must not be empty".into(),
            });
        }
        Ok(())
    }
}
