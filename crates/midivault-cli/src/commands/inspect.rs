//! Inspect command: parse a stored file and summarize it.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use midivault_backend_smf::smf::SmfValidator;

use crate::commands::json_output::{
    error_codes, to_json_string, InspectOutput, InspectResult, JsonError,
};
use crate::service::MidiService;

/// Run the inspect command.
pub fn run(service: &MidiService, id: u64, json: bool) -> Result<ExitCode> {
    if json {
        let output = match inspect(service, id) {
            Ok(result) => InspectOutput::success(result),
            Err(e) => InspectOutput::failure(vec![e]),
        };
        println!("{}", to_json_string(&output));
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let data = service.fetch(id)?;
    let report = SmfValidator::validate(&data)
        .with_context(|| format!("Stored file {} is not a valid MIDI file", id))?;
    let result = InspectResult::from_report(id, &report);

    println!("{} {}", "MIDI file".cyan().bold(), id.to_string().bold());
    println!(
        "  {}: {}",
        "Path".dimmed(),
        service.store().path_for(id).display()
    );
    println!("  {}: {} bytes", "Size".dimmed(), result.file_size);
    println!(
        "  {}: {} ({} {})",
        "Format".dimmed(),
        result.format,
        result.tracks,
        if result.tracks == 1 { "track" } else { "tracks" }
    );
    match result.ppq {
        Some(ppq) => println!("  {}: {} ticks per quarter note", "Division".dimmed(), ppq),
        None => println!("  {}: SMPTE", "Division".dimmed()),
    }
    if let Some(bpm) = result.tempo_bpm {
        println!("  {}: {:.2} bpm", "Tempo".dimmed(), bpm);
    }
    if result.program_changes.is_empty() {
        println!("  {}: none", "Programs".dimmed());
    } else {
        let programs: Vec<String> = result
            .program_changes
            .iter()
            .map(|(channel, program)| format!("ch{}={}", channel, program))
            .collect();
        println!("  {}: {}", "Programs".dimmed(), programs.join(", "));
    }
    println!(
        "  {}: {} on, {} off",
        "Notes".dimmed(),
        result.note_on_count,
        result.note_off_count
    );
    println!("  {}: {} ticks", "Length".dimmed(), result.total_ticks);

    Ok(ExitCode::SUCCESS)
}

/// Loads and summarizes a stored file.
pub fn inspect(service: &MidiService, id: u64) -> Result<InspectResult, JsonError> {
    let data = service.fetch(id).map_err(|e| JsonError::from(&e))?;
    let report = SmfValidator::validate(&data).map_err(|e| {
        JsonError::new(
            error_codes::INVALID_SMF,
            format!("Stored file {} is not a valid MIDI file: {}", id, e),
        )
    })?;
    Ok(InspectResult::from_report(id, &report))
}
