//! Request handler logic for the WebSocket server.

use base64::Engine;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use midivault_core::{parse_artifact_id, CreateRequest, ErrorCode};

use crate::commands::json_output::{
    error_codes, to_json_string, CreateOutput, FetchOutput, JsonError,
};
use crate::service::MidiService;

use super::types::{ErrorResponse, MidiRequest};

/// Message for a fetch request without an id.
pub const MISSING_ID_MESSAGE: &str = "Parameter 'id' is required";

/// Process a single WebSocket message and return a response.
pub fn process_message(service: &MidiService, msg: Message) -> Option<String> {
    match msg {
        Message::Text(text) => Some(handle_request(service, &text)),
        Message::Binary(data) => match String::from_utf8(data) {
            Ok(text) => Some(handle_request(service, &text)),
            Err(_) => Some(to_json_string(&ErrorResponse::new(
                error_codes::INVALID_UTF8,
                "Binary message must be valid UTF-8 JSON",
            ))),
        },
        // Control frames are answered by tungstenite.
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}

/// Handle a JSON request and return a JSON response.
pub fn handle_request(service: &MidiService, json_text: &str) -> String {
    let request: MidiRequest = match serde_json::from_str(json_text) {
        Ok(req) => req,
        Err(e) => {
            debug!(error = %e, "rejected request");
            return to_json_string(&ErrorResponse::new(
                ErrorCode::InvalidRequest.code(),
                format!("Invalid request JSON: {}", e),
            ));
        }
    };

    match request {
        MidiRequest::CreateMidi {
            parameters,
            programs,
            notes,
        } => {
            let request = CreateRequest {
                parameters,
                programs,
                notes,
            };
            to_json_string(&create_midi(service, request))
        }
        MidiRequest::FetchMidi { id } => to_json_string(&fetch_midi(service, id.as_ref())),
    }
}

/// Validate, encode and store a create request.
pub fn create_midi(service: &MidiService, request: CreateRequest) -> CreateOutput {
    let record = match request.validate() {
        Ok(r) => r,
        Err(e) => return CreateOutput::failure(vec![JsonError::from(&e)]),
    };

    match service.create(&record) {
        Ok(created) => CreateOutput::success(&created),
        Err(e) => CreateOutput::failure(vec![JsonError::from(&e)]),
    }
}

/// Look up a stored file and return it base64-encoded.
pub fn fetch_midi(service: &MidiService, id: Option<&serde_json::Value>) -> FetchOutput {
    let raw = match id {
        Some(value) if !value.is_null() => value,
        _ => {
            return FetchOutput::failure(vec![JsonError::new(
                ErrorCode::MissingParameter.code(),
                MISSING_ID_MESSAGE,
            )]);
        }
    };

    let Some(id) = parse_artifact_id(raw) else {
        return FetchOutput::failure(vec![JsonError::new(
            ErrorCode::ArtifactNotFound.code(),
            format!("Midi file with id '{}' does not exist", display_id(raw)),
        )]);
    };

    match service.fetch(id) {
        Ok(data) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&data);
            FetchOutput::success(id, encoded)
        }
        Err(e) => FetchOutput::failure(vec![JsonError::from(&e)]),
    }
}

fn display_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
