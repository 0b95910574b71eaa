//! # Observability
//!
//! Tracing initialisation and `metrics` facade recording.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON/Pretty/Compact)
//! - Session and sampler metrics through the `metrics` facade
//! - Inter-sample interval statistics for a recorded session
//!
//! No exporter is installed here; whichever `metrics` recorder the embedding
//! application installs receives the values.
//!
//! ## Example
//!
//! ```ignore
//! use observability::{init, IntervalStats};
//!
//! observability::init()?;
//!
//! let stats = IntervalStats::from_samples(&samples, 0.005);
//! println!("{}", stats.summary());
//! ```

pub mod metrics;

use std::str::FromStr;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-exports
pub use crate::metrics::{
    record_import, record_motion_available, record_reconcile, record_sample_collected,
    record_sample_interval_ms, record_sensor_gap, record_session_finished,
    record_session_started, IntervalStats, IntervalSummary, RunningStats, SessionOutcome,
    StatsSummary,
};

/// Initialise tracing with the default configuration
///
/// JSON logs, `RUST_LOG` overrides the level.
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Used when `RUST_LOG` is not set
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Build from the `[logging]` section of the tool configuration
    pub fn from_logging(logging: &contracts::LoggingConfig) -> Self {
        Self {
            log_format: logging.format.parse().unwrap_or_default(),
            default_log_level: logging.level.clone(),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON
    #[default]
    Json,
    /// Human readable, multi-line
    Pretty,
    /// Single line
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Initialise with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer().pretty();

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer().compact();

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
    }

    tracing::info!(log_format = ?config.log_format, "Observability initialized");

    Ok(())
}
