//! Minimum-version filtering of comparison reports.
//!
//! The filter walks an arbitrary JSON tree and narrows the list-valued
//! fields named in [`LIST_POLICIES`] to entries whose embedded release is at
//! least the threshold. Everything else in the tree is preserved as is.
//! Entries whose release cannot be parsed are dropped rather than reported.

use amirecon_common::error::{ReconError, Result};
use serde_json::Value;

use crate::version::{ReleaseVersion, version_of_path};

/// How the elements of a filtered list are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPolicy {
    /// Elements are parameter paths; non-string elements are dropped.
    Paths,
    /// Elements are objects whose `key` field holds the parameter path.
    KeyedEntries,
}

/// Field names whose list values are filtered, and how.
pub const LIST_POLICIES: &[(&str, ListPolicy)] = &[
    ("matching", ListPolicy::Paths),
    ("only_in_s3", ListPolicy::Paths),
    ("only_in_ssm", ListPolicy::Paths),
    ("mismatched", ListPolicy::KeyedEntries),
    ("wrong_owner", ListPolicy::KeyedEntries),
];

const ENTRY_KEY_FIELD: &str = "key";

/// Returns the policy for a field name, if the field is filtered.
#[must_use]
pub fn policy_for(field: &str) -> Option<ListPolicy> {
    LIST_POLICIES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, policy)| *policy)
}

/// Filters comparison trees against a minimum release.
#[derive(Debug, Clone)]
pub struct VersionGate {
    min_version: ReleaseVersion,
}

impl VersionGate {
    /// Creates a gate admitting releases at or above `min_version`.
    #[must_use]
    pub const fn new(min_version: ReleaseVersion) -> Self {
        Self { min_version }
    }

    /// Creates a gate from a threshold string such as `1.14.3`.
    ///
    /// # Errors
    ///
    /// Returns `ReconError::InvalidVersion` if the threshold is not a release.
    pub fn from_threshold(min_version: &str) -> Result<Self> {
        Ok(Self::new(min_version.parse()?))
    }

    /// Returns the threshold.
    #[must_use]
    pub const fn min_version(&self) -> &ReleaseVersion {
        &self.min_version
    }

    /// Returns whether the release embedded in `path` meets the threshold.
    #[must_use]
    pub fn admits(&self, path: &str) -> bool {
        version_of_path(path).is_some_and(|version| version >= self.min_version)
    }

    /// Returns a filtered copy of `tree`. The input is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ReconError::InvalidStructure` if `tree` is neither an object
    /// nor an array.
    pub fn filter(&self, tree: &Value) -> Result<Value> {
        if !(tree.is_object() || tree.is_array()) {
            return Err(ReconError::InvalidStructure {
                message: format!(
                    "expected an object or array at the top level, found {}",
                    kind_of(tree)
                ),
            });
        }
        let mut filtered = tree.clone();
        self.apply(&mut filtered);
        Ok(filtered)
    }

    fn apply(&self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (field, child) in map.iter_mut() {
                    if let Value::Array(items) = child {
                        if let Some(policy) = policy_for(field) {
                            let before = items.len();
                            items.retain(|item| self.keeps(policy, item));
                            tracing::trace!(
                                field = %field,
                                before,
                                after = items.len(),
                                "filtered list"
                            );
                        }
                    } else if child.is_object() {
                        self.apply(child);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut().filter(|item| item.is_object()) {
                    self.apply(item);
                }
            }
            _ => {}
        }
    }

    fn keeps(&self, policy: ListPolicy, item: &Value) -> bool {
        let path = match policy {
            ListPolicy::Paths => item.as_str(),
            ListPolicy::KeyedEntries => item.get(ENTRY_KEY_FIELD).and_then(Value::as_str),
        };
        path.is_some_and(|p| self.admits(p))
    }
}

/// Filters `tree` to entries at or above `min_version`.
///
/// # Errors
///
/// Returns an error if the threshold is not a release or the tree is neither
/// an object nor an array.
pub fn filter_versions(tree: &Value, min_version: &str) -> Result<Value> {
    VersionGate::from_threshold(min_version)?.filter(tree)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
