//! Note events, event tags, and instrument assignments.

use serde::{Deserialize, Serialize};

/// Caller-defined value identifying the kind of a note event.
///
/// Which tag means "note on" and which means "note off" is decided by the
/// request's parameters, not by this type. Numbers compare numerically, so a
/// tag of `1` equals a tag of `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTag {
    Bool(bool),
    Number(f64),
    Text(String),
    /// An array or object. Accepted so the note can be skipped, but never
    /// equal to a sentinel.
    Other(serde_json::Value),
}

impl EventTag {
    /// Whether the tag is a plain number, string or boolean.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, EventTag::Other(_))
    }
}

impl From<f64> for EventTag {
    fn from(value: f64) -> Self {
        EventTag::Number(value)
    }
}

impl From<i32> for EventTag {
    fn from(value: i32) -> Self {
        EventTag::Number(value as f64)
    }
}

impl From<i64> for EventTag {
    fn from(value: i64) -> Self {
        EventTag::Number(value as f64)
    }
}

impl From<&str> for EventTag {
    fn from(value: &str) -> Self {
        EventTag::Text(value.to_string())
    }
}

/// One timestamped note event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI channel (only the low 4 bits are encoded).
    pub channel: u32,
    /// Note number (only the low 7 bits are encoded).
    pub pitch: u32,
    /// Absolute timestamp in milliseconds.
    pub time: f64,
    /// Event tag, compared against the note-on/note-off sentinels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventTag>,
}

impl NoteEvent {
    pub fn new(time: f64, event: impl Into<EventTag>, channel: u32, pitch: u32) -> Self {
        Self {
            channel,
            pitch,
            time,
            event: Some(event.into()),
        }
    }
}

/// Binds a channel to an instrument program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentAssignment {
    pub channel: u32,
    pub program: u32,
}

impl InstrumentAssignment {
    pub fn new(channel: u32, program: u32) -> Self {
        Self { channel, program }
    }
}
