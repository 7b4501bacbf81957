//! Unified error types for the amirecon workspace.
//!
//! Malformed individual entries (unparseable names, unparseable versions) are
//! never errors; they degrade to omission. The variants here cover I/O,
//! collaborator failures, and structurally invalid input.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ReconError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// An external program failed or produced unusable output.
    #[error("{program} failed: {message}")]
    Command {
        /// Program that was invoked.
        program: String,
        /// Description of the failure, usually including stderr.
        message: String,
    },

    /// Input did not have the shape a collaborator promised.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the structural violation.
        message: String,
    },

    /// A version threshold could not be parsed.
    #[error("invalid release version: {value:?}")]
    InvalidVersion {
        /// The rejected input.
        value: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ReconError>;
