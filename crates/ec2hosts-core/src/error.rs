//! Error types for ec2hosts-core

use std::path::PathBuf;

/// Result type for ec2hosts-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ec2hosts-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed markers, unterminated block or unreadable input
    #[error(transparent)]
    Edit(#[from] ec2hosts_blocks::Error),

    /// Filesystem error from ec2hosts-fs
    #[error(transparent)]
    Fs(#[from] ec2hosts_fs::Error),

    /// Filter syntax or an unsupported filter name
    #[error("Invalid filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// Inventory document could not be used
    #[error("Invalid inventory {path}: {message}")]
    Inventory { path: PathBuf, message: String },

    /// Settings that contradict each other or are out of range
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ec2hosts_blocks::Aborted> for Error {
    fn from(aborted: ec2hosts_blocks::Aborted) -> Self {
        tracing::debug!(
            partial_bytes = aborted.partial.len(),
            "Discarding partial output of aborted scan"
        );
        Self::Edit(aborted.error)
    }
}
