//! Per-region snapshots of parameter-store results.
//!
//! Each region is cached in its own `ssm_cache_{region}.json` file holding
//! a flat path to value object.

use std::path::PathBuf;

use amirecon_common::constants::SNAPSHOT_FILE_PREFIX;
use amirecon_common::error::Result;
use amirecon_common::types::Region;
use amirecon_core::mapping::KeyMapping;

use crate::store::{read_json, write_json};

/// Directory of per-region parameter snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Opens a cache rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the snapshot file for a region.
    #[must_use]
    pub fn path_for(&self, region: &Region) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_FILE_PREFIX}{region}.json"))
    }

    /// Returns whether a snapshot exists for `region`.
    #[must_use]
    pub fn contains(&self, region: &Region) -> bool {
        self.path_for(region).exists()
    }

    /// Loads the snapshot for `region`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or parsed.
    pub fn load(&self, region: &Region) -> Result<Option<KeyMapping>> {
        if !self.contains(region) {
            return Ok(None);
        }
        let keys: KeyMapping = read_json(&self.path_for(region))?;
        tracing::info!(region = %region, parameters = keys.len(), "loaded cached parameters");
        Ok(Some(keys))
    }

    /// Stores the snapshot for `region`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn store(&self, region: &Region, keys: &KeyMapping) -> Result<()> {
        write_json(&self.path_for(region), keys)
    }
}
