//! File-based logging
//!
//! The TUI owns the terminal, so all tracing output goes to a daily rolling
//! file under `.logs/` instead of stdout.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "spotify-preview";
const DEFAULT_FILTER: &str = "spotify_preview=debug,rspotify=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `.logs/spotify-preview.YYYY-MM-DD.log`. `RUST_LOG`
/// overrides the default filter.
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes on drop; must live as long as the process
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);
    Ok(())
}

/// Log the outcome of a catalog or identity request
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = %$operation, "API request successful"),
            Err(e) => tracing::error!(operation = %$operation, error = %e, "API request failed"),
        }
    };
}

/// Log the start of a request with extra fields
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = %$operation, $($field)*, "API request started");
    };
}
