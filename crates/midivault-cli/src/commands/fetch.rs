//! Fetch command: copy a stored file out of the store.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::service::MidiService;

/// Run the fetch command.
///
/// Writes the artifact to `out`, or to `<id>.mid` in the current directory.
pub fn run(service: &MidiService, id: u64, out: Option<&Path>) -> Result<ExitCode> {
    let data = service.fetch(id)?;
    let out_path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(service, id));

    fs::write(&out_path, &data)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    println!(
        "{} Wrote MIDI file {} to {} ({} bytes)",
        "SUCCESS".green().bold(),
        id,
        out_path.display(),
        data.len()
    );
    println!(
        "  {}: {}",
        "Hash".dimmed(),
        blake3::hash(&data).to_hex()
    );

    Ok(ExitCode::SUCCESS)
}

fn default_output_path(service: &MidiService, id: u64) -> PathBuf {
    let stored = service.store().path_for(id);
    match stored.file_name() {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(format!("{}.mid", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midivault_backend_smf::Timing;
    use midivault_store::ArtifactStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path_is_file_name() {
        let service = MidiService::new(ArtifactStore::new("some/store"), Timing::default());
        assert_eq!(default_output_path(&service, 12), PathBuf::from("12.mid"));
    }

    #[test]
    fn test_fetch_writes_bytes() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path().join("files"));
        let id = store.save(b"MThd-bytes").unwrap();
        let service = MidiService::new(store, Timing::default());

        let out = tmp.path().join("copy.mid");
        run(&service, id, Some(&out)).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"MThd-bytes");
    }

    #[test]
    fn test_fetch_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let service = MidiService::new(ArtifactStore::new(tmp.path()), Timing::default());
        let err = run(&service, 4, Some(&tmp.path().join("x.mid"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{}", err);
    }
}
