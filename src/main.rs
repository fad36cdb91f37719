//! # Scribe - A Line-Oriented Text Editor
//!
//! A small terminal editor driven by typed commands, built on the
//! `scribe-core` document session.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start with an untitled document
//! cargo run
//!
//! # Open (or create) a file
//! cargo run -- notes.txt
//!
//! # Use a specific config file, with debug logging
//! cargo run -- --config scribe.toml -vv notes.txt
//! ```
//!
//! Type `:help` at the prompt for the command list.

mod app;
mod input;
mod prompt;
mod storage;

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_core::Config;

use crate::app::App;
use crate::prompt::TerminalPrompt;
use crate::storage::FileStorage;

/// Scribe - a line-oriented text editor
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Maps the `-v` count to a log level.
fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG, when set, overrides the -v count
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level(args.verbose)).into())
        .from_env_lossy();

    // Logs go to stderr so they don't interleave with document output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Could not load config {}", path.display()))?,
        None => Config::load(),
    };

    let storage = FileStorage::new(config.files.atomic_save);
    let mut app = App::new(&config, storage, TerminalPrompt);

    if let Some(path) = &args.file {
        app.open_or_create(path)?;
    }

    // Read stdin a line at a time; the prompt reads from it too
    let lines = std::iter::from_fn(|| {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(err) => Some(Err(err)),
        }
    });

    app.run(lines, &mut io::stdout())?;

    tracing::info!("Scribe exiting");
    Ok(())
}
