//! midivault CLI - Encode note events into Standard MIDI Files and store them
//!
//! This binary provides commands for creating, fetching, listing and
//! inspecting stored MIDI files, and a WebSocket server exposing the same
//! create and fetch operations.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use midivault_cli::{commands, logging, Config, ConfigOverrides, MidiService};

/// midivault - MIDI File Encoding and Storage
#[derive(Parser)]
#[command(name = "midivault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Store directory (default: $MIDIVAULT_STORE_DIR or ./files)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Tempo in beats per minute (default: $MIDIVAULT_BPM or 120)
    #[arg(long, global = true)]
    bpm: Option<f64>,

    /// Ticks per quarter note (default: $MIDIVAULT_PPQ or 128)
    #[arg(long, global = true)]
    ppq: Option<u16>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a create request and store the MIDI file
    Create {
        /// Path to the create request JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Write a stored MIDI file to disk
    Fetch {
        /// Id of the stored file
        #[arg(long)]
        id: u64,

        /// Output path (default: <id>.mid in the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List stored MIDI files
    List,

    /// Summarize a stored MIDI file
    Inspect {
        /// Id of the stored file
        #[arg(long)]
        id: u64,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Start the WebSocket server
    Serve {
        /// Port to listen on (default: $MIDIVAULT_PORT or 9124)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let overrides = ConfigOverrides {
        store_dir: cli.store_dir,
        bpm: cli.bpm,
        ppq: cli.ppq,
        port: match &cli.command {
            Commands::Serve { port } => *port,
            _ => None,
        },
    };

    let result = Config::resolve(&overrides).and_then(|config| {
        let service = MidiService::from_config(&config)?;
        match cli.command {
            Commands::Create { input, json } => commands::create::run(&service, &input, json),
            Commands::Fetch { id, out } => commands::fetch::run(&service, id, out.as_deref()),
            Commands::List => commands::list::run(&service),
            Commands::Inspect { id, json } => commands::inspect::run(&service, id, json),
            Commands::Serve { .. } => commands::serve::run(service, config.port),
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
