//! Request and response types for the WebSocket server.

use serde::{Deserialize, Serialize};

use midivault_core::{InstrumentAssignment, NoteEvent, RequestParameters};

use crate::commands::json_output::JsonError;

/// Request types supported by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MidiRequest {
    /// Encode and store a performance.
    CreateMidi {
        #[serde(default)]
        parameters: Option<RequestParameters>,
        #[serde(default)]
        programs: Option<Vec<InstrumentAssignment>>,
        #[serde(default)]
        notes: Option<Vec<NoteEvent>>,
    },
    /// Return a stored file as base64.
    FetchMidi {
        /// Integer or decimal string; anything else is reported as not found.
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
}

/// Error response for requests that could not be parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Whether the request succeeded (always false for errors).
    pub success: bool,
    /// Error details.
    pub errors: Vec<JsonError>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![JsonError::new(code, message)],
        }
    }
}
