//! File-based tracing setup.
//!
//! Logs go to a daily-rotated file under `${VERSO_HOME}/logs`; stdout and
//! stderr stay clean for the front-ends. The filter comes from `VERSO_LOG`
//! (same syntax as `RUST_LOG`).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::paths;

const LOG_ENV_VAR: &str = "VERSO_LOG";
const DEFAULT_FILTER: &str = "verso=info";

/// Initializes the global tracing subscriber.
///
/// Returns `None` when the logs directory cannot be created or a subscriber
/// is already installed; logging is best-effort and never blocks startup.
/// The returned guard must be held for the lifetime of the process so
/// buffered log lines are flushed on exit.
pub fn init() -> Option<WorkerGuard> {
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "verso.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(guard)
}
