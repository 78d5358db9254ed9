//! JSON output types for machine-readable CLI and server output.
//!
//! The same structures are printed by `create --json` and `inspect --json`
//! and sent as WebSocket responses by `serve`.

use serde::{Deserialize, Serialize};

use midivault_backend_smf::smf::SmfReport;
use midivault_core::{BackendError, RequestError};

use crate::service::{CreatedArtifact, ServiceError};

/// Error codes for CLI-level failures.
///
/// Request and storage failures use the `MV_xxx` codes from `midivault-core`.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// JSON serialization error
    pub const JSON_SERIALIZE: &str = "CLI_003";
    /// Binary WebSocket message is not UTF-8
    pub const INVALID_UTF8: &str = "CLI_004";
    /// Stored file is not a readable SMF
    pub const INVALID_SMF: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "MV_002", "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Builds an error from any error carrying a stable code.
    pub fn from_backend<E: BackendError>(err: &E) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<&RequestError> for JsonError {
    fn from(err: &RequestError) -> Self {
        JsonError::from_backend(err)
    }
}

impl From<&ServiceError> for JsonError {
    fn from(err: &ServiceError) -> Self {
        JsonError::from_backend(err)
    }
}

/// Output of a create operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// BLAKE3 hash of the stored file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl CreateOutput {
    pub fn success(created: &CreatedArtifact) -> Self {
        Self {
            success: true,
            id: Some(created.id),
            hash: Some(created.hash.clone()),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            id: None,
            hash: None,
            errors,
        }
    }
}

/// Output of a fetch operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Base64-encoded SMF bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl FetchOutput {
    pub fn success(id: u64, data: String) -> Self {
        Self {
            success: true,
            id: Some(id),
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            id: None,
            data: None,
            errors,
        }
    }
}

/// Summary of a stored SMF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectResult {
    pub id: u64,
    pub file_size: usize,
    pub format: u16,
    pub tracks: usize,
    /// Ticks per quarter note; absent for SMPTE division.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppq: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_bpm: Option<f64>,
    /// `[channel, program]` pairs in track order
    pub program_changes: Vec<(u8, u8)>,
    pub note_on_count: usize,
    pub note_off_count: usize,
    pub total_ticks: u64,
}

impl InspectResult {
    pub fn from_report(id: u64, report: &SmfReport) -> Self {
        let tracks = &report.tracks;
        Self {
            id,
            file_size: report.file_size,
            format: report.header.format.as_u16(),
            tracks: tracks.len(),
            ppq: report.header.ppq(),
            tempo_bpm: report.tempo_bpm(),
            program_changes: tracks.iter().flat_map(|t| t.program_changes()).collect(),
            note_on_count: tracks.iter().map(|t| t.note_on_count()).sum(),
            note_off_count: tracks.iter().map(|t| t.note_off_count()).sum(),
            total_ticks: tracks.iter().map(|t| t.total_ticks()).max().unwrap_or(0),
        }
    }
}

/// Output of `inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<InspectResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl InspectOutput {
    pub fn success(result: InspectResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }
}

/// Serializes `value`, falling back to a fixed error document.
pub fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        let fallback = CreateOutput::failure(vec![JsonError::new(
            error_codes::JSON_SERIALIZE,
            format!("Failed to serialize response: {}", e),
        )]);
        serde_json::to_string(&fallback).unwrap_or_else(|_| {
            r#"{"success":false,"errors":[{"code":"CLI_003","message":"Failed to serialize response"}]}"#.to_string()
        })
    })
}
