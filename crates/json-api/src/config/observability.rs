//! Logging and request observability config

use clap::Args;

/// Output encoding for the fmt layer.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, for terminals.
    Compact,

    /// One JSON object per event, with span context.
    Json,
}

/// Log filtering and output.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` holds no valid filter
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Request observability settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Requests slower than this many milliseconds are logged as warnings.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}
