//! Tracing subscriber setup.
//!
//! The filter is read from `QUIRE_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`. A process that owns the terminal must not log to it,
//! so local browsing writes to a file instead of stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "QUIRE_LOG";

const LOG_FILE_NAME: &str = "quire.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Write to stderr (server mode).
    Stderr,
    /// Append to `quire.log` inside the given directory (terminal mode).
    File(&'a Path),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
///
/// The returned guard flushes the non-blocking file writer on drop and must
/// be held for as long as logging is needed. Installing twice is not an
/// error; the second subscriber is simply ignored.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(target: LogTarget<'_>) -> Result<Option<WorkerGuard>> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .is_ok();
            // Dropping the guard shuts the writer down when another subscriber won.
            Ok(installed.then_some(guard))
        }
    }
}
