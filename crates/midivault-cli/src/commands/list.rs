//! List command: show stored artifacts.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use crate::service::MidiService;

/// Run the list command.
pub fn run(service: &MidiService) -> Result<ExitCode> {
    let store = service.store();
    let info = store.info()?;

    println!("{}", "Stored MIDI files".cyan().bold());
    println!("  {}: {}", "Store directory".dimmed(), info.root.display());

    if info.artifact_count == 0 {
        println!("  {}", "Store is empty".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    for id in store.list()? {
        println!("  {}", store.path_for(id).display());
    }

    let size_kb = info.total_size_bytes as f64 / 1024.0;
    println!(
        "  {} {} {}, {:.2} KB, next id {}",
        "Total:".dimmed(),
        info.artifact_count,
        if info.artifact_count == 1 { "file" } else { "files" },
        size_kb,
        info.next_id
    );

    Ok(ExitCode::SUCCESS)
}
