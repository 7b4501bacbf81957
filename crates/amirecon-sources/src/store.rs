//! JSON files exchanged between runs: the object-store mapping, comparison
//! reports, and their filtered copies.

use std::path::Path;

use amirecon_common::error::{ReconError, Result};
use amirecon_core::mapping::RegionKeyMapping;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads a JSON document into `T`.
///
/// # Errors
///
/// Returns `ReconError::NotFound` if the file does not exist, or an error if
/// it cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ReconError::NotFound {
            kind: "file",
            id: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes `value` as indented JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReconError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote JSON document");
    Ok(())
}

/// Loads the object-store mapping file.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn load_mapping(path: &Path) -> Result<RegionKeyMapping> {
    let mapping: RegionKeyMapping = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        regions = mapping.region_count(),
        entries = mapping.entry_count(),
        "loaded object-store mapping"
    );
    Ok(mapping)
}

/// Saves the object-store mapping file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_mapping(path: &Path, mapping: &RegionKeyMapping) -> Result<()> {
    write_json(path, mapping)
}
