use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the background log writer alive. Dropping it flushes the file.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to a daily file in `dir`. Used while the TUI owns the terminal.
pub fn init_file_logging(level: &str, dir: &Path) -> Result<FileLogGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, "wortle.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(FileLogGuard { _guard: guard })
}

pub fn init_stderr_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
