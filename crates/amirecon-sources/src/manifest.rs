//! AMI manifests produced by the image build pipeline.
//!
//! A manifest is a JSON object keyed by region whose values describe the
//! image registered there:
//!
//! ```json
//! {
//!   "us-west-2": {
//!     "id": "ami-0123",
//!     "name": "bottlerocket-aws-k8s-1.24-x86_64-v1.14.3-0a1b2c3d"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use amirecon_common::constants::AMI_MANIFEST_SUFFIX;
use amirecon_common::error::{ReconError, Result};
use amirecon_common::types::ImageRecord;
use amirecon_core::mapping::RegionKeyMapping;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: Option<String>,
    name: Option<String>,
}

/// Parses manifest text into image records.
///
/// Entries missing an `id` or a `name` are skipped.
///
/// # Errors
///
/// Returns an error if the text is not a JSON object of region entries.
pub fn parse_manifest(content: &str) -> Result<Vec<ImageRecord>> {
    let entries: BTreeMap<String, ManifestEntry> = serde_json::from_str(content)?;
    let mut records = Vec::with_capacity(entries.len());
    for (region, entry) in entries {
        match (entry.name, entry.id) {
            (Some(name), Some(id)) => records.push(ImageRecord::new(region.as_str(), name, id)),
            (name, _) => {
                tracing::warn!(
                    region = %region,
                    name = ?name,
                    "manifest entry without name or id, skipping"
                );
            }
        }
    }
    Ok(records)
}

/// Finds every manifest file below `root`, in sorted path order.
///
/// # Errors
///
/// Returns `ReconError::NotFound` if `root` is not a directory, or an I/O
/// error if a directory cannot be listed.
pub fn scan_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ReconError::NotFound {
            kind: "manifest directory",
            id: root.display().to_string(),
        });
    }
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| ReconError::Io {
            path: dir.clone(),
            source: e,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| ReconError::Io {
                    path: dir.clone(),
                    source: e,
                })?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if is_manifest(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    tracing::info!(root = %root.display(), manifests = found.len(), "scanned for AMI manifests");
    Ok(found)
}

/// A place that holds AMI manifests.
pub trait ManifestStore {
    /// Lists the manifests in the order they are merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    fn list(&self) -> Result<Vec<String>>;

    /// Returns the text of one listed manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read.
    fn read(&self, id: &str) -> Result<String>;
}

/// Manifests in a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalManifests {
    root: PathBuf,
}

impl LocalManifests {
    /// Opens the tree rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestStore for LocalManifests {
    fn list(&self) -> Result<Vec<String>> {
        Ok(scan_manifests(&self.root)?
            .into_iter()
            .map(|path| path.display().to_string())
            .collect())
    }

    fn read(&self, id: &str) -> Result<String> {
        let path = Path::new(id);
        tracing::debug!(path = %path.display(), "reading AMI manifest");
        std::fs::read_to_string(path).map_err(|e| ReconError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Builds the mapping of every manifest in `store`.
///
/// Each manifest is translated into its own mapping and merged into the
/// result in listing order, so later manifests win for the same path.
/// Manifests that cannot be read or parsed are logged and skipped.
///
/// # Errors
///
/// Returns an error if the store cannot be listed.
pub fn build_mapping(store: &dyn ManifestStore) -> Result<RegionKeyMapping> {
    let mut mapping = RegionKeyMapping::new();
    let mut merged = 0_usize;
    for id in store.list()? {
        let records = match store.read(&id).and_then(|text| parse_manifest(&text)) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(manifest = %id, error = %e, "skipping unreadable manifest");
                continue;
            }
        };
        mapping.merge(RegionKeyMapping::from_records(&records));
        merged += 1;
    }
    tracing::info!(
        manifests = merged,
        regions = mapping.region_count(),
        "built parameter mapping"
    );
    Ok(mapping)
}

/// Returns whether `name` is an AMI manifest file name or object key.
pub(crate) fn is_manifest_name(name: &str) -> bool {
    name.ends_with(AMI_MANIFEST_SUFFIX)
}

fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_manifest_name)
}
