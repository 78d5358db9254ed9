//! Runtime configuration.
//!
//! Each setting is taken from the command line if given, then from its
//! `MIDIVAULT_*` environment variable, then from the built-in default.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use midivault_backend_smf::{Timing, DEFAULT_BPM, DEFAULT_PPQ};
use midivault_store::ArtifactStore;

use crate::commands::serve::DEFAULT_PORT;

/// Default store directory, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = "files";

pub const ENV_STORE_DIR: &str = "MIDIVAULT_STORE_DIR";
pub const ENV_BPM: &str = "MIDIVAULT_BPM";
pub const ENV_PPQ: &str = "MIDIVAULT_PPQ";
pub const ENV_PORT: &str = "MIDIVAULT_PORT";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub bpm: f64,
    pub ppq: u16,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            bpm: DEFAULT_BPM,
            ppq: DEFAULT_PPQ,
            port: DEFAULT_PORT,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub store_dir: Option<PathBuf>,
    pub bpm: Option<f64>,
    pub ppq: Option<u16>,
    pub port: Option<u16>,
}

impl Config {
    /// Resolves the configuration against the process environment.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves the configuration with a custom environment lookup.
    pub fn resolve_with<F>(overrides: &ConfigOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let store_dir = match &overrides.store_dir {
            Some(dir) => dir.clone(),
            None => env(ENV_STORE_DIR)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
        };

        let config = Config {
            store_dir,
            bpm: pick(overrides.bpm, ENV_BPM, &env, defaults.bpm)?,
            ppq: pick(overrides.ppq, ENV_PPQ, &env, defaults.ppq)?,
            port: pick(overrides.port, ENV_PORT, &env, defaults.port)?,
        };

        // Reject bad tempo settings up front rather than on the first request.
        config.timing()?;
        Ok(config)
    }

    /// Encoder timing for this configuration.
    pub fn timing(&self) -> Result<Timing> {
        Timing::new(self.bpm, self.ppq)
            .with_context(|| format!("Invalid timing: bpm={} ppq={}", self.bpm, self.ppq))
    }

    /// Artifact store rooted at `store_dir`.
    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.store_dir)
    }
}

fn pick<T, F>(flag: Option<T>, key: &str, env: &F, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    match env(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}
