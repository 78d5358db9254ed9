//! Directory-backed artifact store.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use midivault_core::MIDI_EXTENSION;
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Name of the lock file guarding id allocation.
pub const LOCK_FILE_NAME: &str = ".alloc.lock";

/// Summary of a store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    /// Store directory.
    pub root: PathBuf,
    /// Number of artifacts.
    pub artifact_count: usize,
    /// Total size of all artifacts in bytes.
    pub total_size_bytes: u64,
    /// Id the next save would receive.
    pub next_id: u64,
}

/// Stores encoded MIDI files under integer ids.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the artifact with the given id.
    pub fn path_for(&self, id: u64) -> PathBuf {
        self.root.join(format!("{}.{}", id, MIDI_EXTENSION))
    }

    /// Stores `data` under a freshly allocated id and returns the id.
    ///
    /// The allocation lock is held from the directory scan until the file is
    /// written, so concurrent savers in other processes receive distinct ids.
    pub fn save(&self, data: &[u8]) -> Result<u64, StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let lock = self.acquire_lock()?;
        let result = self.save_locked(data);
        // Dropping the handle releases the lock as well; unlock explicitly so
        // failures to release surface in the log.
        if let Err(e) = FileExt::unlock(&lock) {
            warn!(error = %e, "Failed to release allocation lock");
        }
        result
    }

    fn save_locked(&self, data: &[u8]) -> Result<u64, StoreError> {
        let id = self.next_id()?;
        let path = self.path_for(id);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::IdCollision(path));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        if let Err(e) = file.write_all(data).and_then(|_| file.sync_all()) {
            // Leave no partial artifact behind.
            let _ = fs::remove_file(&path);
            return Err(StoreError::io(&path, e));
        }

        info!(id, bytes = data.len(), path = %path.display(), "Stored artifact");
        Ok(id)
    }

    fn acquire_lock(&self) -> Result<File, StoreError> {
        let lock_path = self.root.join(LOCK_FILE_NAME);
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| StoreError::io(&lock_path, e))?;
        debug!(path = %lock_path.display(), "Acquired allocation lock");
        Ok(lock)
    }

    /// Reads the artifact with the given id.
    ///
    /// Anything at the artifact path that is not a regular file is reported
    /// as not found, matching what `list` counts.
    pub fn load(&self, id: u64) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(id);
        match fs::read(&path) {
            Ok(data) => {
                debug!(id, bytes = data.len(), "Loaded artifact");
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound || !path.is_file() => {
                Err(StoreError::NotFound(id))
            }
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Returns whether an artifact with the given id exists.
    pub fn contains(&self, id: u64) -> bool {
        self.path_for(id).is_file()
    }

    /// Lists the ids of all stored artifacts in ascending order.
    ///
    /// A missing store directory is an empty store.
    pub fn list(&self) -> Result<Vec<u64>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(MIDI_EXTENSION) {
                continue;
            }
            match artifact_id(&path) {
                Some(id) => ids.push(id),
                None => warn!(path = %path.display(), "Skipping file with non-numeric name"),
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    /// Returns the id the next save would receive: one more than the largest
    /// stored id, or `0` when the store is empty.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        match self.list()?.last() {
            None => Ok(0),
            Some(&max) => max.checked_add(1).ok_or(StoreError::IdsExhausted),
        }
    }

    /// Summarizes the store contents.
    pub fn info(&self) -> Result<StoreInfo, StoreError> {
        let ids = self.list()?;
        let mut total_size_bytes = 0;
        for &id in &ids {
            let path = self.path_for(id);
            let metadata = fs::metadata(&path).map_err(|e| StoreError::io(&path, e))?;
            total_size_bytes += metadata.len();
        }

        let next_id = match ids.last() {
            None => 0,
            Some(&max) => max.checked_add(1).ok_or(StoreError::IdsExhausted)?,
        };

        Ok(StoreInfo {
            root: self.root.clone(),
            artifact_count: ids.len(),
            total_size_bytes,
            next_id,
        })
    }
}

/// Extracts the artifact id from a path like `files/12.mid`.
///
/// Returns `None` unless the extension is exactly `mid` and the stem is a
/// decimal integer.
pub fn artifact_id(path: &Path) -> Option<u64> {
    if path.extension()?.to_str()? != MIDI_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}
