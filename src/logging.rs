//! File-based logging for disk-player
//!
//! The terminal belongs to the player UI, so tracing output goes to a daily
//! rotating file instead of stdout.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "disk-player";
const DEFAULT_FILTER: &str = "disk_player=debug,rspotify=info,reqwest=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/disk-player.YYYY-MM-DD.log`. `RUST_LOG`
/// overrides the default filter:
///
/// - `disk_player` modules: DEBUG
/// - `rspotify`, `reqwest`: INFO
/// - Other crates: WARN
///
/// The returned guard flushes pending lines when dropped; keep it alive
/// until shutdown.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "Logging initialized");

    Ok(guard)
}

/// Log a remote player request and its result
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "API request successful"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "API request failed"),
        }
    };
}

/// Log a remote player request with additional context
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "API request started");
    };
}
