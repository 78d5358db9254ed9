//! Test fixtures: temporary stores and synthetic create requests.

use std::fs;
use std::path::{Path, PathBuf};

use midivault_backend_smf::Timing;
use midivault_cli::MidiService;
use midivault_store::ArtifactStore;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Note-on tag used by the generated requests.
pub const NOTE_ON: i64 = 144;
/// Note-off tag used by the generated requests.
pub const NOTE_OFF: i64 = 128;

/// A temporary working directory with a store under `files/`.
pub struct StoreFixture {
    pub root: TempDir,
    pub service: MidiService,
}

impl StoreFixture {
    /// Create a fixture with default timing.
    pub fn new() -> Self {
        Self::with_timing(Timing::default())
    }

    pub fn with_timing(timing: Timing) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let store = ArtifactStore::new(root.path().join("files"));
        Self {
            service: MidiService::new(store, timing),
            root,
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn store(&self) -> &ArtifactStore {
        self.service.store()
    }

    /// Write a request document into the working directory.
    pub fn write_request(&self, name: &str, request: &Value) -> PathBuf {
        let path = self.path().join(name);
        let text = serde_json::to_string_pretty(request).expect("Failed to serialize request");
        fs::write(&path, text).expect("Failed to write request file");
        path
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-channel ascending scale: `count` notes of `step_ms` each.
pub fn scale_request(channel: u32, program: u32, step_ms: f64, count: u32) -> Value {
    let mut notes = Vec::new();
    for i in 0..count {
        let start = i as f64 * step_ms;
        notes.push(json!({"time": start, "event": NOTE_ON, "channel": channel, "pitch": 60 + i}));
        notes.push(json!({"time": start + step_ms * 0.9, "event": NOTE_OFF, "channel": channel, "pitch": 60 + i}));
    }
    json!({
        "parameters": {"NOTE_ON": NOTE_ON, "NOTE_OFF": NOTE_OFF, "NOTE_VELOCITY": 100},
        "programs": [{"channel": channel, "program": program}],
        "notes": notes,
    })
}

/// A held triad on three channels with one unrecognized event mixed in.
pub fn chord_request() -> Value {
    json!({
        "parameters": {"NOTE_ON": "on", "NOTE_OFF": "off"},
        "programs": [
            {"channel": 0, "program": 0},
            {"channel": 1, "program": 40},
            {"channel": 2, "program": 73}
        ],
        "notes": [
            {"time": 0, "event": "on", "channel": 0, "pitch": 60},
            {"time": 0, "event": "on", "channel": 1, "pitch": 64},
            {"time": 0, "event": "on", "channel": 2, "pitch": 67},
            {"time": 500, "event": "sustain", "channel": 0, "pitch": 60},
            {"time": 1000, "event": "off", "channel": 0, "pitch": 60},
            {"time": 1000, "event": "off", "channel": 1, "pitch": 64},
            {"time": 1000, "event": "off", "channel": 2, "pitch": 67}
        ]
    })
}
