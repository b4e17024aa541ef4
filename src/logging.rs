//! Logging configuration for Vouch.
//!
//! The TUI owns the terminal, so log output always goes to a file; writing to
//! stderr would corrupt the display mid-session.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes file logging for the TUI session.
///
/// `filter` overrides the `RUST_LOG` environment filter when given. When the
/// log file cannot be opened a warning goes to stderr and logging stays off.
pub fn init_file_logging(filter: Option<&str>) {
    let log_file = match open_log_file() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: logging disabled, could not open log file: {e}");
            return;
        }
    };

    let env_filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Creates the log directory and truncates last session's file.
fn open_log_file() -> io::Result<File> {
    let path = get_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Returns the path for the log file.
///
/// `~/.local/state/sql-vouch/vouch.log` on Linux (XDG state directory), the
/// platform config directory elsewhere, the temp directory as a last resort.
pub fn get_log_path() -> PathBuf {
    let base = dirs::state_dir()
        .or_else(dirs::config_dir)
        .unwrap_or_else(std::env::temp_dir);
    base.join("sql-vouch").join("vouch.log")
}
