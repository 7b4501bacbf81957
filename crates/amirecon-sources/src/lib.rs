//! # amirecon-sources
//!
//! Collaborators that feed and persist the reconciliation core.
//!
//! Handles:
//! - **Aws**: Running the `aws` command line.
//! - **Manifest**: `*-amis.json` build artifacts, directory scanning, and
//!   merging them into a mapping.
//! - **S3**: Manifests listed and read from the build bucket.
//! - **Store**: Mapping, report, and JSON tree files.
//! - **Snapshot**: Per-region cache of parameter-store results.
//! - **Ssm**: Parameter-store queries through the `aws` command line.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod aws;
pub mod manifest;
pub mod s3;
pub mod snapshot;
pub mod ssm;
pub mod store;
