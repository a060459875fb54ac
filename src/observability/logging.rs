//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber once at startup
//! - Write to stdout, optionally to a daily rotated file
//! - Feed the `/log` websocket stream
//!
//! # Design Decisions
//! - Level comes from the CLI; `RUST_LOG` overrides it
//! - The file writer is non-blocking; its guard must live until exit

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::observability::log_stream::LogBroadcaster;

/// Prefix of rotated log file names.
pub const LOG_FILE_PREFIX: &str = "bridge-relay";

/// Logging switches, usually taken from the command line.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Default level directive, e.g. `info` or `bridge_relay=debug`.
    pub level: String,
    /// Also write logs to `logs_dir`.
    pub save_to_file: bool,
    pub logs_dir: PathBuf,
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            save_to_file: false,
            logs_dir: PathBuf::from("logs"),
            ansi: true,
        }
    }
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file logging is enabled.
pub fn init_logging(
    options: &LoggingOptions,
    stream: Option<LogBroadcaster>,
) -> Result<Option<WorkerGuard>, TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level.as_str()));

    let stdout_layer = tracing_subscriber::fmt::layer().with_ansi(options.ansi);

    let (file_layer, guard) = if options.save_to_file {
        let appender = tracing_appender::rolling::daily(&options.logs_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stream_layer = stream.map(|broadcaster| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(broadcaster)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(stream_layer)
        .try_init()?;

    Ok(guard)
}
