//! Byte-level tests for encoded SMF output.
//!
//! These tests check complete files against hand-assembled bytes and verify
//! the timing properties of the delta-time stream.

use midivault_backend_smf::smf::{SmfFormat, SmfValidator};
use midivault_backend_smf::{encode, encode_record, ms_to_ticks, EncodingParameters, Timing};
use midivault_core::{CreateRequest, InstrumentAssignment, NoteEvent};
use pretty_assertions::assert_eq;

// =============================================================================
// Helper Functions
// =============================================================================

fn params() -> EncodingParameters {
    EncodingParameters {
        timing: Timing::default(),
        note_on: Some("on".into()),
        note_off: Some("off".into()),
        velocity: 90,
    }
}

fn scale(step_ms: f64, count: u32) -> Vec<NoteEvent> {
    let mut notes = Vec::new();
    for i in 0..count {
        let start = i as f64 * step_ms * 2.0;
        notes.push(NoteEvent::new(start, "on", 0, 60 + i));
        notes.push(NoteEvent::new(start + step_ms, "off", 0, 60 + i));
    }
    notes
}

// =============================================================================
// Bit-exact Layout
// =============================================================================

#[test]
fn test_single_note_file_bytes() {
    let programs = vec![InstrumentAssignment::new(0, 40)];
    let notes = vec![
        NoteEvent::new(0.0, "on", 0, 60),
        NoteEvent::new(480.0, "off", 0, 60),
    ];
    let result = encode(&params(), &programs, &notes).unwrap();

    let mut expected = Vec::new();
    // Header: MThd, length 6, format 0, 1 track, 128 ppq
    expected.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x80");
    // Track chunk, 22 bytes of events
    expected.extend_from_slice(b"MTrk\x00\x00\x00\x16");
    // Tempo 500000 us/qn
    expected.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    // Program change channel 0 -> 40
    expected.extend_from_slice(&[0x00, 0xC0, 40]);
    // Note on at delta 0
    expected.extend_from_slice(&[0x00, 0x90, 60, 90]);
    // Note off at delta 122
    expected.extend_from_slice(&[0x7A, 0x80, 60, 90]);
    // End of track
    expected.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    assert_eq!(result.data, expected);
}

#[test]
fn test_empty_request_is_tempo_only() {
    let result = encode(&params(), &[], &[]).unwrap();
    assert_eq!(result.data.len(), 14 + 8 + 7 + 4);
    assert_eq!(result.total_ticks, 0);

    let report = SmfValidator::validate(&result.data).unwrap();
    assert_eq!(report.header.format, SmfFormat::SingleTrack);
    assert_eq!(report.tracks[0].events.len(), 2);
}

#[test]
fn test_long_delta_uses_multibyte_vlq() {
    // 10 seconds at 120 bpm / 128 ppq = 2560 ticks = 0x0A00 -> 0x94 0x00
    let notes = vec![NoteEvent::new(10_000.0, "on", 0, 60)];
    let result = encode(&params(), &[], &notes).unwrap();

    let tail = &result.data[result.data.len() - 4 - 5..result.data.len() - 4];
    assert_eq!(tail, &[0x94, 0x00, 0x90, 60, 90]);
}

#[test]
fn test_custom_timing_changes_header_and_tempo() {
    let p = EncodingParameters {
        timing: Timing::new(90.0, 480).unwrap(),
        ..params()
    };
    let result = encode(&p, &[], &[]).unwrap();
    let report = SmfValidator::validate(&result.data).unwrap();

    assert_eq!(report.header.ppq(), Some(480));
    assert_eq!(report.tracks[0].tempo(), Some(666_666));
}

// =============================================================================
// Timing Properties
// =============================================================================

#[test]
fn test_delta_sum_equals_total_elapsed() {
    let timing = Timing::default();
    for step in [1.0, 7.3, 125.0, 333.333, 1000.0] {
        let notes = scale(step, 12);
        let result = encode(&params(), &[], &notes).unwrap();

        let last = notes.last().unwrap().time;
        assert_eq!(
            result.total_ticks,
            ms_to_ticks(last, timing.ms_per_tick()) as u64,
            "step {}ms",
            step
        );

        let report = SmfValidator::validate(&result.data).unwrap();
        assert_eq!(report.tracks[0].total_ticks(), result.total_ticks);
    }
}

#[test]
fn test_simultaneous_events_have_zero_delta() {
    let notes = vec![
        NoteEvent::new(500.0, "on", 0, 60),
        NoteEvent::new(500.0, "on", 0, 64),
        NoteEvent::new(500.0, "on", 0, 67),
    ];
    let result = encode(&params(), &[], &notes).unwrap();
    let report = SmfValidator::validate(&result.data).unwrap();

    let deltas: Vec<u32> = report.tracks[0].notes().iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![128, 0, 0]);
}

// =============================================================================
// Determinism and Requests
// =============================================================================

#[test]
fn test_encoding_is_deterministic() {
    let programs = vec![InstrumentAssignment::new(1, 40), InstrumentAssignment::new(2, 73)];
    let notes = scale(62.5, 24);

    let first = encode(&params(), &programs, &notes).unwrap();
    for _ in 0..5 {
        let again = encode(&params(), &programs, &notes).unwrap();
        assert_eq!(again.data, first.data);
        assert_eq!(again.hash, first.hash);
    }
}

#[test]
fn test_program_overwrite_example() {
    let record = CreateRequest::from_json(
        r#"{
            "parameters": {"NOTE_ON": 1, "NOTE_OFF": 0},
            "programs": [{"channel": 1, "program": 40}, {"channel": 1, "program": 41}],
            "notes": []
        }"#,
    )
    .unwrap()
    .validate()
    .unwrap();

    let result = encode_record(&record, Timing::default()).unwrap();
    let report = SmfValidator::validate(&result.data).unwrap();

    assert_eq!(report.tracks[0].program_changes(), vec![(1, 40), (1, 41)]);
    assert_eq!(report.tracks[0].final_program(1), Some(41));
}

#[test]
fn test_request_velocity_is_applied() {
    let record = CreateRequest::from_json(
        r#"{
            "parameters": {"NOTE_ON": 1, "NOTE_OFF": 0, "NOTE_VELOCITY": 127},
            "programs": [],
            "notes": [{"time": 0, "event": 1, "channel": 3, "pitch": 48}]
        }"#,
    )
    .unwrap()
    .validate()
    .unwrap();

    let result = encode_record(&record, Timing::default()).unwrap();
    assert_eq!(&result.data[result.data.len() - 8..result.data.len() - 4], &[0x00, 0x93, 48, 127]);
}
