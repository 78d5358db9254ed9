//! midivault End-to-End Test Infrastructure
//!
//! This crate provides integration tests that run the full create/fetch
//! pipeline against a temporary store:
//!
//! - Create: request JSON -> encoded SMF -> `<id>.mid`
//! - Fetch: id -> stored bytes
//! - **Determinism**: identical requests produce byte-identical files
//! - Serve: the same operations over a WebSocket connection
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p midivault-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::{chord_request, scale_request, StoreFixture, NOTE_OFF, NOTE_ON};
