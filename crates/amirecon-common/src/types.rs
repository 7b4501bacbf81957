//! Domain primitive types used across the amirecon workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cloud region name such as `us-west-2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Creates a region from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the region name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Region {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One image discovered in a build artifact: where it was published,
/// the raw name it was published under, and its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Region the image was registered in.
    pub region: Region,
    /// Raw hyphen-delimited image name.
    pub name: String,
    /// Identifier assigned by the provider (e.g. `ami-0123...`).
    pub image_id: String,
}

impl ImageRecord {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(
        region: impl Into<Region>,
        name: impl Into<String>,
        image_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
            image_id: image_id.into(),
        }
    }
}
