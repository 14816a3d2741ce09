//! Tracing setup. Logs go to an append-only file under the XDG state dir;
//! the CLI drops to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or does not parse.
const DEFAULT_FILTER: &str = "info,igdl=debug,igdl_core=debug";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Path of the log file: `~/.local/state/igdl/igdl.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("igdl")?;
    Ok(xdg_dirs.get_state_home().join("igdl.log"))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for `target`. Fails if the log file cannot
/// be opened or a subscriber is already installed.
pub fn init(target: LogTarget) -> Result<()> {
    let writer = match &target {
        LogTarget::File(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))?;

    if let LogTarget::File(path) = &target {
        tracing::info!("igdl logging initialized at {}", path.display());
    }
    Ok(())
}

/// File logging at [`log_file_path`]. On error the caller should fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    init(LogTarget::File(log_file_path()?))
}

/// Stderr-only logging. Never fails; a second install is ignored.
pub fn init_logging_stderr() {
    let _ = init(LogTarget::Stderr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn open_log_file_creates_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/igdl/igdl.log");
        open_log_file(&path).unwrap().write_all(b"one\n").unwrap();
        open_log_file(&path).unwrap().write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn open_log_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let err = open_log_file(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("open log file"));
    }
}
