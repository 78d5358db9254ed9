//! midivault Artifact Store
//!
//! Persists encoded MIDI files in a flat directory as `<id>.mid` and
//! allocates ids as `max(existing) + 1` (or `0` for an empty store).
//!
//! Allocation scans the directory, so it is only safe with a single writer at
//! a time. The store enforces that with an exclusive advisory lock on
//! `<root>/.alloc.lock` held around the scan and the write, and opens the new
//! artifact with `create_new` so an id collision is an error rather than a
//! silent overwrite.
//!
//! # Example
//!
//! ```no_run
//! use midivault_store::ArtifactStore;
//!
//! let store = ArtifactStore::new("files");
//! let id = store.save(b"MThd...")?;
//! let bytes = store.load(id)?;
//! # Ok::<(), midivault_store::StoreError>(())
//! ```

mod error;
mod store;

pub use error::StoreError;
pub use store::{artifact_id, ArtifactStore, StoreInfo, LOCK_FILE_NAME};
