//! Interactive dictation CLI for Voice Notes.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI flags.
//! 3. Load [`AppConfig`] from disk (returns default on first run) and apply
//!    flag overrides.
//! 4. Build the collaborators: typed-input speech engine, static
//!    permissions, fixed-directory sink.
//! 5. Run the command loop until the user quits.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use voice_notes::{
    config::AppConfig,
    export::DirectorySink,
    note::CaptureMode,
    permission::StaticPermissions,
    session::{CaptureOutcome, SessionController},
    speech::TypedSpeechEngine,
};

// ---------------------------------------------------------------------------
// CLI flags
// ---------------------------------------------------------------------------

/// Capture speech-to-text notes and export them as Markdown.
#[derive(Debug, Parser)]
#[command(name = "voice-notes", version)]
struct Cli {
    /// Capture mode, overriding the configured one.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<CaptureMode>,

    /// Export directory, overriding the configured one.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

/// Flag spelling for [`CaptureMode`], kept here so the domain type stays
/// free of CLI concerns.
fn parse_mode(s: &str) -> Result<CaptureMode, String> {
    match s {
        "single-buffer" => Ok(CaptureMode::SingleBuffer),
        "note-list" => Ok(CaptureMode::NoteList),
        other => Err(format!(
            "unknown mode `{other}` (expected `single-buffer` or `note-list`)"
        )),
    }
}

// ---------------------------------------------------------------------------
// Command loop helpers
// ---------------------------------------------------------------------------

/// Read one line from stdin on the blocking pool; `None` at end-of-input.
async fn read_command() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| -> std::io::Result<Option<String>> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write!(out, "[c]apture  [e]xport  [s]how  [q]uit > ")?;
        out.flush()?;

        let stdin = std::io::stdin();
        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line)?;
        Ok((read > 0).then(|| line.trim().to_string()))
    })
    .await??;
    Ok(line)
}

/// Print the display projection of the store: the raw buffer, or the entry
/// list newest first.
fn show_store(session: &SessionController) {
    let store = session.store();
    if store.is_empty() {
        println!("(no notes yet)");
        return;
    }
    match store.buffer() {
        Some(buffer) => println!("{buffer}"),
        None => {
            for entry in store.entries() {
                println!("### {}", entry.title());
                println!("{} - {}", entry.date_token(), entry.time_token());
                println!();
                println!("{}", entry.content());
                println!();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Notes starting up");

    // 2. Flags
    let cli = Cli::parse();

    // 3. Configuration + overrides
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if let Some(mode) = cli.mode {
        config.capture.mode = mode;
    }
    if let Some(out_dir) = cli.out_dir {
        config.export.directory = Some(out_dir);
    }

    // 4. Collaborators
    let sink = match &config.export.directory {
        Some(dir) => DirectorySink::new(dir),
        None => DirectorySink::default_documents(),
    };
    log::info!("exports will be written to {}", sink.root().display());

    let mut session = SessionController::new(
        config.capture.mode,
        Arc::new(StaticPermissions::granted()),
        Arc::new(TypedSpeechEngine::new()),
        Arc::new(sink),
    )
    .with_recognize_config(config.capture.recognize_config());

    // 5. Command loop
    loop {
        let command = match read_command().await? {
            Some(c) => c,
            None => break, // end of input
        };

        match command.as_str() {
            "c" | "capture" => match session.capture().await {
                Ok(CaptureOutcome::Captured(entry)) => {
                    println!("captured [{}] {}", entry.time_token(), entry.content());
                }
                Ok(CaptureOutcome::Discarded) => {
                    println!("(nothing captured)");
                }
                Err(e) => eprintln!("{e}"),
            },
            "e" | "export" => match session.export().await {
                Ok(receipt) => {
                    println!(
                        "exported {} bytes to {}",
                        receipt.bytes_written, receipt.destination
                    );
                }
                Err(e) => eprintln!("{e}"),
            },
            "s" | "show" => show_store(&session),
            "q" | "quit" => break,
            "" => {}
            other => eprintln!("unknown command: {other}"),
        }
    }

    log::info!("Voice Notes shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
