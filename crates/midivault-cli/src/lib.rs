//! midivault CLI library.
//!
//! This crate wires the request types, the SMF encoder and the artifact store
//! together behind the `midivault` binary and its WebSocket service.

pub mod commands;
pub mod config;
pub mod logging;
pub mod service;

pub use config::{Config, ConfigOverrides};
pub use service::{CreatedArtifact, MidiService, ServiceError};
