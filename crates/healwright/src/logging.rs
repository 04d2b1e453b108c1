//! Tracing subscriber setup: console output plus an execution log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive; dropping it flushes and stops the
/// file appender. Hold it for the duration of the test run.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber: a console layer and a non-blocking file
/// layer writing `test_execution.log` under `log_dir`.
///
/// Filtering follows `RUST_LOG` when set, defaulting to `info`. Calling this
/// twice is harmless; the second call leaves the existing subscriber in
/// place.
pub fn init(log_dir: impl AsRef<Path>) -> LogGuard {
    let file_appender = tracing_appender::rolling::never(log_dir.as_ref(), "test_execution.log");
    let (file_writer, worker) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init();

    LogGuard { _worker: worker }
}
