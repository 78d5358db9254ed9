//! midivault SMF Backend - Deterministic Standard MIDI File Encoding
//!
//! This crate converts a list of absolute-time note events plus per-channel
//! instrument assignments into a single-track Standard MIDI File.
//!
//! # Determinism
//!
//! Encoding is a pure function of its inputs: the same parameters, programs
//! and notes always produce byte-identical output. Every result carries the
//! BLAKE3 hash of its bytes.
//!
//! # Example
//!
//! ```
//! use midivault_backend_smf::{encode, EncodingParameters, Timing};
//! use midivault_core::{InstrumentAssignment, NoteEvent};
//!
//! let params = EncodingParameters {
//!     timing: Timing::default(),
//!     note_on: Some(144.into()),
//!     note_off: Some(128.into()),
//!     velocity: 90,
//! };
//! let programs = vec![InstrumentAssignment::new(0, 40)];
//! let notes = vec![
//!     NoteEvent::new(0.0, 144, 0, 60),
//!     NoteEvent::new(480.0, 128, 0, 60),
//! ];
//!
//! let result = encode(&params, &programs, &notes).unwrap();
//! assert_eq!(&result.data[0..4], b"MThd");
//! assert_eq!(result.total_ticks, 122);
//! ```
//!
//! # Module Structure
//!
//! - [`smf`]: SMF chunk writer and validator
//! - [`timing`]: Tempo and millisecond-to-tick conversion
//! - [`encode`]: Note events to track encoding

pub mod encode;
pub mod smf;
pub mod timing;

pub use encode::{
    encode, encode_record, encode_track, EncodeError, EncodeResult, EncodingParameters, EventKind,
    DEFAULT_VELOCITY, MAX_VELOCITY,
};
pub use timing::{ms_to_ticks, Timing, DEFAULT_BPM, DEFAULT_PPQ};
