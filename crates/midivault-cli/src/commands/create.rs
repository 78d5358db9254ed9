//! Create command: encode a request file and store the result.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use midivault_core::{CreateRequest, MidiRecord};

use crate::commands::json_output::{error_codes, to_json_string, CreateOutput, JsonError};
use crate::service::MidiService;

/// Run the create command.
///
/// # Arguments
/// * `service` - Service to encode and store with
/// * `input` - Path to the create request JSON
/// * `json` - Print a `CreateOutput` document instead of colored text
pub fn run(service: &MidiService, input: &Path, json: bool) -> Result<ExitCode> {
    if json {
        let output = create_output(service, input);
        println!("{}", to_json_string(&output));
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read request file: {}", input.display()))?;
    let record = parse_record(&text)?;
    let created = service.create(&record)?;

    println!(
        "{} Created MIDI file {}",
        "SUCCESS".green().bold(),
        created.id.to_string().bold()
    );
    println!(
        "  {}: {}",
        "Path".dimmed(),
        service.store().path_for(created.id).display()
    );
    println!("  {}: {} bytes", "Size".dimmed(), created.size);
    println!("  {}: {}", "Hash".dimmed(), created.hash);
    if created.notes_ignored > 0 {
        println!(
            "  {}: {} note {} with an unrecognized event tag",
            "Skipped".yellow(),
            created.notes_ignored,
            if created.notes_ignored == 1 { "event" } else { "events" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Parses and validates a create request document.
pub fn parse_record(text: &str) -> Result<MidiRecord> {
    let record = CreateRequest::from_json(text)?.validate()?;
    Ok(record)
}

fn create_output(service: &MidiService, input: &Path) -> CreateOutput {
    let text = match fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => {
            return CreateOutput::failure(vec![JsonError::new(
                error_codes::FILE_READ,
                format!("Failed to read {}: {}", input.display(), e),
            )]);
        }
    };

    let record = match CreateRequest::from_json(&text).and_then(CreateRequest::validate) {
        Ok(r) => r,
        Err(e) => return CreateOutput::failure(vec![JsonError::from(&e)]),
    };

    match service.create(&record) {
        Ok(created) => CreateOutput::success(&created),
        Err(e) => CreateOutput::failure(vec![JsonError::from(&e)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midivault_backend_smf::Timing;
    use midivault_store::ArtifactStore;
    use tempfile::TempDir;

    #[test]
    fn test_parse_record_reports_missing_field() {
        let err = parse_record(r#"{"parameters": {}, "notes": []}"#).unwrap_err();
        assert!(err.to_string().contains("programs"), "{}", err);
    }

    #[test]
    fn test_create_output_for_missing_file() {
        let tmp = TempDir::new().unwrap();
        let service = MidiService::new(ArtifactStore::new(tmp.path()), Timing::default());
        let output = create_output(&service, &tmp.path().join("nope.json"));
        assert!(!output.success);
        assert_eq!(output.errors[0].code, error_codes::FILE_READ);
    }

    #[test]
    fn test_create_output_stores_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(
            &input,
            r#"{"parameters": {"NOTE_ON": 1}, "programs": [], "notes": [{"time": 0, "event": 1, "channel": 0, "pitch": 60}]}"#,
        )
        .unwrap();

        let service = MidiService::new(ArtifactStore::new(tmp.path().join("files")), Timing::default());
        let output = create_output(&service, &input);
        assert!(output.success, "{:?}", output.errors);
        assert_eq!(output.id, Some(0));
        assert!(service.store().path_for(0).is_file());
    }
}
