//! Create and fetch request types.
//!
//! A [`CreateRequest`] is parsed leniently: every top-level field is optional
//! so that a missing field can be reported as [`RequestError::MissingField`]
//! rather than as a JSON error. [`CreateRequest::validate`] turns it into a
//! [`MidiRecord`] whose fields are all present.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::event::{EventTag, InstrumentAssignment, NoteEvent};

/// The `parameters` object of a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestParameters {
    /// Tag value that marks a note-on event.
    #[serde(rename = "NOTE_ON", default, skip_serializing_if = "Option::is_none")]
    pub note_on: Option<EventTag>,
    /// Tag value that marks a note-off event.
    #[serde(rename = "NOTE_OFF", default, skip_serializing_if = "Option::is_none")]
    pub note_off: Option<EventTag>,
    /// Velocity applied to every note record.
    #[serde(
        rename = "NOTE_VELOCITY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub note_velocity: Option<u32>,
}

/// A create request as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub parameters: Option<RequestParameters>,
    #[serde(default)]
    pub programs: Option<Vec<InstrumentAssignment>>,
    #[serde(default)]
    pub notes: Option<Vec<NoteEvent>>,
}

impl CreateRequest {
    /// Parses a create request from JSON.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks that `parameters`, `programs` and `notes` are all present.
    ///
    /// The first missing field (in that order) is reported.
    pub fn validate(self) -> Result<MidiRecord, RequestError> {
        let parameters = self
            .parameters
            .ok_or(RequestError::MissingField("parameters"))?;
        let programs = self.programs.ok_or(RequestError::MissingField("programs"))?;
        let notes = self.notes.ok_or(RequestError::MissingField("notes"))?;

        Ok(MidiRecord {
            parameters,
            programs,
            notes,
        })
    }
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiRecord {
    pub parameters: RequestParameters,
    pub programs: Vec<InstrumentAssignment>,
    pub notes: Vec<NoteEvent>,
}

impl MidiRecord {
    /// Converts the record to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, RequestError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Interprets a caller-supplied artifact id.
///
/// Accepts a non-negative JSON integer or a string spelling one exactly as the
/// store names its files (decimal, no leading zeros). Anything else yields
/// `None`, which callers report as a missing artifact.
pub fn parse_artifact_id(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => {
            let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
            if digits_only && (s == "0" || !s.starts_with('0')) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}
