//! Structured logging setup.
//!
//! Initializes a `tracing` subscriber with:
//! - `RUST_LOG` environment filter support (default `clipdeck=info`)
//! - JSON output when `RUST_LOG_FORMAT=json`
//! - stderr for headless commands, a log file while the TUI owns the terminal

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default log file used by the TUI.
pub fn default_log_file() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "clipdeck")
        .context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("clipdeck.log"))
}

/// Initialize the global tracing subscriber.
///
/// Subsequent calls are no-ops.
pub fn init(target: &LogTarget) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clipdeck=info"));

    let is_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if is_json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
