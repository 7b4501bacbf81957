//! # amirecon-core
//!
//! Pure reconciliation logic for Bottlerocket image inventories.
//!
//! Handles:
//! - **Translate**: Raw image names to canonical parameter paths.
//! - **Mapping**: Per-region path to image-id mappings built from image records.
//! - **Reconcile**: Four-way comparison of two mappings and multi-region reports.
//! - **Version**: Release-number parsing and ordering.
//! - **Gate**: Structure-preserving minimum-version filtering of reports.
//!
//! Nothing in this crate performs I/O. Inventories arrive fully materialized
//! from the collaborators in `amirecon-sources`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod gate;
pub mod mapping;
pub mod reconcile;
pub mod translate;
pub mod version;
