//! Tracing subscriber setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Installs the global subscriber.
///
/// Events go to `path`, opened for append, and also to stderr if `stderr` is
/// set. `RUST_LOG` takes precedence over `filter`. The returned guard must be
/// held until exit so buffered events are flushed.
pub fn init(path: &Path, filter: &str, stderr: bool) -> Result<WorkerGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)?,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs_err::create_dir_all(dir).map_err(LoggingError::CreateDir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_layer = stderr.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}

/// Error returned by [`init`].
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter")]
    Filter(#[from] ParseError),
    #[error("log path {0:?} has no file name")]
    InvalidPath(String),
    #[error("failed to create log directory")]
    CreateDir(#[source] std::io::Error),
    #[error("a global subscriber is already installed")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}
