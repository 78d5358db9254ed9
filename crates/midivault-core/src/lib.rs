//! midivault Request Library
//!
//! This crate provides the types, validation, and hashing for midivault create
//! requests. A create request is a JSON document describing one musical
//! performance: encoding parameters, per-channel instrument assignments, and a
//! list of absolute-time note events.
//!
//! # Example
//!
//! ```
//! use midivault_core::CreateRequest;
//!
//! let json = r#"{
//!     "parameters": {"NOTE_ON": 144, "NOTE_OFF": 128, "NOTE_VELOCITY": 100},
//!     "programs": [{"channel": 0, "program": 40}],
//!     "notes": [
//!         {"time": 0, "event": 144, "channel": 0, "pitch": 60},
//!         {"time": 480, "event": 128, "channel": 0, "pitch": 60}
//!     ]
//! }"#;
//!
//! let record = CreateRequest::from_json(json).unwrap().validate().unwrap();
//! assert_eq!(record.notes.len(), 2);
//! assert_eq!(record.programs[0].program, 40);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error codes and error types shared by every midivault crate
//! - [`event`]: Note events, event tags, and instrument assignments
//! - [`request`]: Create/fetch request types and validation
//! - [`hash`]: Canonical request hashing

pub mod error;
pub mod event;
pub mod hash;
pub mod request;

pub use error::{BackendError, ErrorCode, RequestError};
pub use event::{EventTag, InstrumentAssignment, NoteEvent};
pub use hash::{canonical_record_hash, canonicalize_json};
pub use request::{parse_artifact_id, CreateRequest, MidiRecord, RequestParameters};

/// File extension of stored artifacts.
pub const MIDI_EXTENSION: &str = "mid";
