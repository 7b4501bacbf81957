//! Per-region inventories keyed by canonical parameter path.

use std::collections::BTreeMap;

use amirecon_common::types::{ImageRecord, Region};
use serde::{Deserialize, Serialize};

use crate::translate::ImageIdentity;

/// Canonical parameter path to image identifier, for one region.
pub type KeyMapping = BTreeMap<String, String>;

/// Region to [`KeyMapping`].
///
/// Serializes as a plain JSON object of objects, the layout of the stored
/// mapping file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKeyMapping {
    regions: BTreeMap<Region, KeyMapping>,
}

impl RegionKeyMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping by translating every record.
    ///
    /// Records whose names cannot be translated are skipped.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ImageRecord>) -> Self {
        let mut mapping = Self::new();
        let mut skipped = 0_usize;
        for record in records {
            if !mapping.insert_record(record) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "skipped image records with untranslatable names");
        }
        mapping
    }

    /// Translates one record and stores it under both of its parameter
    /// paths, overwriting earlier values for the same paths.
    ///
    /// Returns `false` if the name could not be translated.
    pub fn insert_record(&mut self, record: &ImageRecord) -> bool {
        let Some(identity) = ImageIdentity::parse(&record.name) else {
            tracing::warn!(
                region = %record.region,
                name = %record.name,
                "cannot translate image name"
            );
            return false;
        };
        let keys = self.regions.entry(record.region.clone()).or_default();
        for path in identity.parameter_paths().iter() {
            let _ = keys.insert(path.to_string(), record.image_id.clone());
        }
        true
    }

    /// Merges `other` into `self`, region by region. Values from `other`
    /// win for paths present in both.
    pub fn merge(&mut self, other: Self) {
        for (region, keys) in other.regions {
            self.regions.entry(region).or_default().extend(keys);
        }
    }

    /// Returns the mapping of one region.
    #[must_use]
    pub fn region(&self, region: &Region) -> Option<&KeyMapping> {
        self.regions.get(region)
    }

    /// Iterates over the regions present.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.keys()
    }

    /// Returns the number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Returns the number of path/value pairs across all regions.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    /// Returns whether no region holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

impl FromIterator<(Region, KeyMapping)> for RegionKeyMapping {
    fn from_iter<I: IntoIterator<Item = (Region, KeyMapping)>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}
