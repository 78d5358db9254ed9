//! Create and fetch operations shared by the CLI commands and the server.

use anyhow::Result;
use midivault_backend_smf::{encode_record, EncodeError, Timing};
use midivault_core::{canonical_record_hash, BackendError, ErrorCode, MidiRecord};
use midivault_store::{ArtifactStore, StoreError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Error from a create or fetch operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to encode MIDI: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The boundary error code reported to callers.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Encode(_) => ErrorCode::EncodeFailed,
            ServiceError::Store(e) if e.is_not_found() => ErrorCode::ArtifactNotFound,
            ServiceError::Store(_) => ErrorCode::StorageFailed,
        }
    }
}

impl BackendError for ServiceError {
    fn code(&self) -> &'static str {
        self.error_code().code()
    }

    fn category(&self) -> &'static str {
        match self {
            ServiceError::Encode(e) => e.category(),
            ServiceError::Store(e) => e.category(),
        }
    }
}

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedArtifact {
    pub id: u64,
    /// BLAKE3 hash of the stored bytes.
    pub hash: String,
    pub size: usize,
    pub notes_written: usize,
    pub notes_ignored: usize,
}

/// Encodes records into a store and reads them back.
#[derive(Debug, Clone)]
pub struct MidiService {
    store: ArtifactStore,
    timing: Timing,
}

impl MidiService {
    pub fn new(store: ArtifactStore, timing: Timing) -> Self {
        Self { store, timing }
    }

    /// Builds the service described by a resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.store(), config.timing()?))
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Encodes a record and stores the file under a new id.
    pub fn create(&self, record: &MidiRecord) -> Result<CreatedArtifact, ServiceError> {
        if let Ok(request_hash) = canonical_record_hash(record) {
            debug!(request_hash = %request_hash, notes = record.notes.len(), "create request");
        }

        let encoded = encode_record(record, self.timing)?;
        let id = self.store.save(&encoded.data)?;

        info!(id, hash = %encoded.hash, bytes = encoded.data.len(), "created MIDI artifact");

        Ok(CreatedArtifact {
            id,
            hash: encoded.hash,
            size: encoded.data.len(),
            notes_written: encoded.notes_written,
            notes_ignored: encoded.notes_ignored,
        })
    }

    /// Returns the bytes stored under `id`.
    pub fn fetch(&self, id: u64) -> Result<Vec<u8>, ServiceError> {
        Ok(self.store.load(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midivault_core::CreateRequest;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn service() -> (TempDir, MidiService) {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path().join("files"));
        (tmp, MidiService::new(store, Timing::default()))
    }

    fn record() -> MidiRecord {
        CreateRequest::from_json(
            r#"{
                "parameters": {"NOTE_ON": 1, "NOTE_OFF": 0},
                "programs": [{"channel": 0, "program": 1}],
                "notes": [
                    {"time": 0, "event": 1, "channel": 0, "pitch": 60},
                    {"time": 250, "event": 0, "channel": 0, "pitch": 60},
                    {"time": 300, "event": 7, "channel": 0, "pitch": 60}
                ]
            }"#,
        )
        .unwrap()
        .validate()
        .unwrap()
    }

    #[test]
    fn test_create_then_fetch() {
        let (_tmp, service) = service();
        let created = service.create(&record()).unwrap();
        assert_eq!(created.id, 0);
        assert_eq!(created.notes_written, 2);
        assert_eq!(created.notes_ignored, 1);

        let data = service.fetch(created.id).unwrap();
        assert_eq!(data.len(), created.size);
        assert_eq!(blake3::hash(&data).to_hex().to_string(), created.hash);
    }

    #[test]
    fn test_ids_increase_per_create() {
        let (_tmp, service) = service();
        let ids: Vec<u64> = (0..3).map(|_| service.create(&record()).unwrap().id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_fetch_missing_maps_to_not_found() {
        let (_tmp, service) = service();
        let err = service.fetch(9).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ArtifactNotFound);
        assert_eq!(err.code(), "MV_002");
        assert_eq!(err.to_string(), "Midi file with id '9' does not exist");
    }
}
