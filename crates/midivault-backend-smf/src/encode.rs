//! Track encoding: note events and instrument assignments to SMF bytes.
//!
//! The track always starts with a tempo event and one program change per
//! instrument assignment, all at delta 0. Note events follow in input order.
//! Each note's delta is the difference between the tick positions of its own
//! timestamp and of the previous event's timestamp, so truncation never
//! accumulates across the stream.

use midivault_core::{
    BackendError, EventTag, InstrumentAssignment, MidiRecord, NoteEvent, RequestParameters,
};
use thiserror::Error;
use tracing::debug;

use crate::smf::{SmfFile, SmfTrack, TrackEventKind};
use crate::timing::{delta_ticks, ms_to_ticks, Timing};

/// Velocity used when a request does not set `NOTE_VELOCITY`.
pub const DEFAULT_VELOCITY: u8 = 90;

/// Largest MIDI velocity.
pub const MAX_VELOCITY: u8 = 127;

/// Error type for track encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Invalid timing or parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error during writing.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BackendError for EncodeError {
    fn code(&self) -> &'static str {
        match self {
            EncodeError::InvalidParameter(_) => "SMF_001",
            EncodeError::IoError(_) => "SMF_002",
        }
    }

    fn category(&self) -> &'static str {
        "smf"
    }
}

/// How the encoder treats one note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    /// Tag matches neither sentinel; no record is emitted.
    Ignored,
}

/// Everything the encoder needs besides the events themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingParameters {
    pub timing: Timing,
    /// Note-on sentinel. `None` matches nothing.
    pub note_on: Option<EventTag>,
    /// Note-off sentinel. `None` matches nothing.
    pub note_off: Option<EventTag>,
    pub velocity: u8,
}

impl EncodingParameters {
    /// Combine configured timing with a request's `parameters` object.
    pub fn from_request(timing: Timing, parameters: &RequestParameters) -> Self {
        Self {
            timing,
            note_on: parameters.note_on.clone(),
            note_off: parameters.note_off.clone(),
            velocity: parameters
                .note_velocity
                .map(|v| v.min(MAX_VELOCITY as u32) as u8)
                .unwrap_or(DEFAULT_VELOCITY),
        }
    }

    /// Classify an event tag. Note-on is checked first, so a tag equal to
    /// both sentinels is a note-on. Array and object tags are always ignored.
    pub fn classify(&self, tag: Option<&EventTag>) -> EventKind {
        let Some(tag) = tag.filter(|t| t.is_scalar()) else {
            return EventKind::Ignored;
        };
        if self.note_on.as_ref() == Some(tag) {
            EventKind::NoteOn
        } else if self.note_off.as_ref() == Some(tag) {
            EventKind::NoteOff
        } else {
            EventKind::Ignored
        }
    }
}

/// Result of encoding a track.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// The complete SMF bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of `data`.
    pub hash: String,
    /// Number of note records written.
    pub notes_written: usize,
    /// Number of note events skipped for an unrecognized tag.
    pub notes_ignored: usize,
    /// Sum of all delta-times in the track.
    pub total_ticks: u64,
}

/// Build the track for the given programs and notes.
///
/// Returns the track and the number of ignored note events.
pub fn encode_track(
    params: &EncodingParameters,
    programs: &[InstrumentAssignment],
    notes: &[NoteEvent],
) -> (SmfTrack, usize) {
    let ratio = params.timing.ms_per_tick();
    let mut track = SmfTrack::new();

    track.push(
        0,
        TrackEventKind::Tempo {
            mpqn: params.timing.tempo_mpqn(),
        },
    );

    for assignment in programs {
        track.push(
            0,
            TrackEventKind::ProgramChange {
                channel: assignment.channel as u8,
                program: assignment.program as u8,
            },
        );
    }

    let mut previous_time = 0.0;
    let mut ignored = 0;

    for note in notes {
        let delta = delta_ticks(
            ms_to_ticks(previous_time, ratio),
            ms_to_ticks(note.time, ratio),
        );
        let channel = note.channel as u8;
        let key = note.pitch as u8;
        let velocity = params.velocity;

        match params.classify(note.event.as_ref()) {
            EventKind::NoteOn => track.push(
                delta,
                TrackEventKind::NoteOn {
                    channel,
                    key,
                    velocity,
                },
            ),
            EventKind::NoteOff => track.push(
                delta,
                TrackEventKind::NoteOff {
                    channel,
                    key,
                    velocity,
                },
            ),
            EventKind::Ignored => ignored += 1,
        }

        previous_time = note.time;
    }

    (track, ignored)
}

/// Encode programs and notes into a complete single-track SMF.
pub fn encode(
    params: &EncodingParameters,
    programs: &[InstrumentAssignment],
    notes: &[NoteEvent],
) -> Result<EncodeResult, EncodeError> {
    let (track, notes_ignored) = encode_track(params, programs, notes);
    let notes_written = notes.len() - notes_ignored;
    let total_ticks = track.total_ticks();

    let file = SmfFile::with_track(params.timing.ppq, track);
    let data = file.to_bytes()?;
    let hash = blake3::hash(&data).to_hex().to_string();

    debug!(
        programs = programs.len(),
        notes_written,
        notes_ignored,
        total_ticks,
        bytes = data.len(),
        "encoded track"
    );

    Ok(EncodeResult {
        data,
        hash,
        notes_written,
        notes_ignored,
        total_ticks,
    })
}

/// Encode a validated create request with the given timing.
pub fn encode_record(record: &MidiRecord, timing: Timing) -> Result<EncodeResult, EncodeError> {
    let params = EncodingParameters::from_request(timing, &record.parameters);
    encode(&params, &record.programs, &record.notes)
}
