//! Four-way comparison of parameter inventories.
//!
//! The left-hand side of every comparison is the inventory derived from
//! build artifacts in the object store (`s3`), the right-hand side the
//! inventory published in the parameter store (`ssm`). Field names of the
//! serialized report match the stored comparison artifacts.

use std::collections::{BTreeMap, BTreeSet};

use amirecon_common::error::Result;
use amirecon_common::types::Region;
use serde::{Deserialize, Serialize};

use crate::mapping::{KeyMapping, RegionKeyMapping};

/// A path present on both sides with different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Canonical parameter path.
    pub key: String,
    /// Value derived from the object store.
    pub s3_value: String,
    /// Value published in the parameter store.
    pub ssm_value: String,
}

/// Comparison of one region's inventories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionComparison {
    /// Paths present on both sides with equal values.
    pub matching: Vec<String>,
    /// Paths present on both sides with different values.
    pub mismatched: Vec<Mismatch>,
    /// Paths only derived from the object store.
    pub only_in_s3: Vec<String>,
    /// Paths only published in the parameter store.
    pub only_in_ssm: Vec<String>,
}

impl RegionComparison {
    /// Returns the total number of paths classified.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matching.len() + self.mismatched.len() + self.only_in_s3.len() + self.only_in_ssm.len()
    }

    /// Returns whether no path was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether both sides agree completely.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatched.is_empty() && self.only_in_s3.is_empty() && self.only_in_ssm.is_empty()
    }
}

/// Partitions the union of both mappings' paths.
///
/// Each path lands in exactly one list. Lists are sorted by path.
#[must_use]
pub fn compare(left: &KeyMapping, right: &KeyMapping) -> RegionComparison {
    let all_keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let mut comparison = RegionComparison::default();

    for key in all_keys {
        match (left.get(key), right.get(key)) {
            (Some(s3_value), Some(ssm_value)) if s3_value == ssm_value => {
                comparison.matching.push(key.clone());
            }
            (Some(s3_value), Some(ssm_value)) => comparison.mismatched.push(Mismatch {
                key: key.clone(),
                s3_value: s3_value.clone(),
                ssm_value: ssm_value.clone(),
            }),
            (Some(_), None) => comparison.only_in_s3.push(key.clone()),
            (None, Some(_)) => comparison.only_in_ssm.push(key.clone()),
            (None, None) => {}
        }
    }
    comparison
}

/// Counts aggregated over every processed region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of matching paths.
    pub total_matching: usize,
    /// Sum of mismatched paths.
    pub total_mismatched: usize,
    /// Sum of paths only in the object store.
    pub total_only_in_s3: usize,
    /// Sum of paths only in the parameter store.
    pub total_only_in_ssm: usize,
}

impl Summary {
    fn add(&mut self, comparison: &RegionComparison) {
        self.total_matching += comparison.matching.len();
        self.total_mismatched += comparison.mismatched.len();
        self.total_only_in_s3 += comparison.only_in_s3.len();
        self.total_only_in_ssm += comparison.only_in_ssm.len();
    }
}

/// Comparison results for every processed region plus running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Per-region results.
    pub by_region: BTreeMap<Region, RegionComparison>,
    /// Totals across `by_region`.
    pub summary: Summary,
}

impl ComparisonReport {
    /// Records a region's comparison and adds it to the totals.
    ///
    /// Recording the same region twice replaces its entry and rebuilds the
    /// totals, so they always describe `by_region`.
    pub fn record(&mut self, region: Region, comparison: RegionComparison) {
        self.summary.add(&comparison);
        if self.by_region.insert(region, comparison).is_some() {
            self.recount();
        }
    }

    fn recount(&mut self) {
        let mut summary = Summary::default();
        for comparison in self.by_region.values() {
            summary.add(comparison);
        }
        self.summary = summary;
    }

    /// Converts the report into a JSON tree for filtering or storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Provider of the parameter-store side of a comparison.
pub trait ParameterSource {
    /// Returns every canonical path and its value for `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be obtained.
    fn fetch(&self, region: &Region) -> Result<KeyMapping>;
}

/// Compares `s3` against `source` for each requested region.
///
/// An empty `regions` slice selects every region present in `s3`. Regions
/// without object-store data are skipped with a warning.
///
/// # Errors
///
/// Returns the first error reported by `source`.
pub fn reconcile(
    s3: &RegionKeyMapping,
    source: &dyn ParameterSource,
    regions: &[Region],
) -> Result<ComparisonReport> {
    let selected: Vec<Region> = if regions.is_empty() {
        s3.regions().cloned().collect()
    } else {
        regions.to_vec()
    };

    let mut report = ComparisonReport::default();
    for region in selected {
        let Some(s3_keys) = s3.region(&region) else {
            tracing::warn!(region = %region, "no object-store data for region, skipping");
            continue;
        };
        tracing::info!(region = %region, "processing region");
        let ssm_keys = source.fetch(&region)?;
        tracing::info!(region = %region, parameters = ssm_keys.len(), "fetched parameters");

        let comparison = compare(s3_keys, &ssm_keys);
        tracing::debug!(
            region = %region,
            matching = comparison.matching.len(),
            mismatched = comparison.mismatched.len(),
            only_in_s3 = comparison.only_in_s3.len(),
            only_in_ssm = comparison.only_in_ssm.len(),
            "compared region"
        );
        report.record(region, comparison);
    }
    Ok(report)
}
