//! Error types for request validation and processing.

use thiserror::Error;

/// Stable error codes reported at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// MV_001: A required request field is absent
    MissingParameter,
    /// MV_002: No stored artifact for the requested id
    ArtifactNotFound,
    /// MV_003: Request body is not valid JSON for the request type
    InvalidRequest,
    /// MV_004: Encoding the track failed
    EncodeFailed,
    /// MV_005: Reading or writing the store failed
    StorageFailed,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "MV_001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingParameter => "MV_001",
            ErrorCode::ArtifactNotFound => "MV_002",
            ErrorCode::InvalidRequest => "MV_003",
            ErrorCode::EncodeFailed => "MV_004",
            ErrorCode::StorageFailed => "MV_005",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Top-level error type for request operations.
#[derive(Debug, Error)]
pub enum RequestError {
    /// One of `parameters`, `programs` or `notes` is absent.
    #[error("Invalid Midi record format: missing '{0}'")]
    MissingField(&'static str),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl BackendError for RequestError {
    fn code(&self) -> &'static str {
        match self {
            RequestError::MissingField(_) => ErrorCode::MissingParameter.code(),
            RequestError::JsonParse(_) => ErrorCode::InvalidRequest.code(),
        }
    }

    fn category(&self) -> &'static str {
        "request"
    }
}

/// Common trait for errors that cross the request boundary.
///
/// Each crate's error type implements this so that the serve and CLI layers
/// can report a stable code without depending on the concrete error.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting (e.g. "MV_002").
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category ("request", "smf", "store").
    fn category(&self) -> &'static str;
}
