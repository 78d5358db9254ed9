//! Error types for the artifact store.

use std::path::PathBuf;

use midivault_core::{BackendError, ErrorCode};
use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact is stored under the id.
    #[error("Midi file with id '{0}' does not exist")]
    NotFound(u64),

    /// The file for a freshly allocated id already exists.
    #[error("Artifact file already exists: {}", .0.display())]
    IdCollision(PathBuf),

    /// The largest stored id is `u64::MAX`.
    #[error("No artifact ids left to allocate")]
    IdsExhausted,

    /// IO error with the path involved.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested artifact is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl BackendError for StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => ErrorCode::ArtifactNotFound.code(),
            StoreError::IdCollision(_) => "STORE_001",
            StoreError::IdsExhausted => "STORE_002",
            StoreError::Io { .. } => "STORE_003",
        }
    }

    fn category(&self) -> &'static str {
        "store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_code() {
        let err = StoreError::NotFound(42);
        assert_eq!(err.to_string(), "Midi file with id '42' does not exist");
        assert_eq!(err.code(), "MV_002");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_error_is_not_not_found() {
        let err = StoreError::io(
            "files/1.mid",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert_eq!(err.category(), "store");
        assert!(err.to_string().contains("files/1.mid"));
    }
}
