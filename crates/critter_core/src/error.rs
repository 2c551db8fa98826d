use std::path::PathBuf;
use thiserror::Error;

/// Failures at the snapshot boundary.
///
/// Read-side failures are recovered by hatching a fresh pet; only a failed
/// write reaches the operator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PersistenceError {
    /// True when there was simply nothing saved yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
