//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file. `RUST_LOG`
//! takes precedence over the configured level.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Default log file for interactive runs.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("probewatch.log")
}

/// Build the filter: `RUST_LOG` if set and valid, otherwise `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the lifetime of the program.
pub fn init(level: &str, target: &LogTarget) -> Result<WorkerGuard> {
    let (writer, guard) = match target {
        LogTarget::File(path) => {
            let (dir, name) = split_path(path)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        }
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(matches!(target, LogTarget::Stderr))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn split_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        let (dir, name) = split_path(Path::new("/var/log/probewatch.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log"));
        assert_eq!(name, PathBuf::from("probewatch.log"));

        let (dir, _) = split_path(Path::new("probewatch.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));

        assert!(split_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_default_log_file_in_temp_dir() {
        assert!(default_log_file().starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        // Must not panic on a malformed directive
        let _ = env_filter("not a [valid directive");
    }
}
