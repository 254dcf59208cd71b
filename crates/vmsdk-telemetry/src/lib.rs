//! # VM SDK Telemetry
//!
//! Process-level observability setup:
//!
//! - [`init_tracing`] installs a `tracing-subscriber` registry with an
//!   `EnvFilter` and a pretty or JSON `fmt` layer
//! - [`encode_metrics`] renders a Prometheus registry in text format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vmsdk_telemetry::{init_tracing, TelemetryConfig};
//!
//! init_tracing(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VMSDK_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `VMSDK_JSON_LOGS` | `false` | JSON output |
//! | `VMSDK_CONSOLE_OUTPUT` | `true` | Write to stdout |
//! | `VMSDK_SERVICE_NAME` | `vmsdk` | Service name |

#![warn(missing_docs)]

mod config;

pub use config::TelemetryConfig;

use prometheus::{Encoder, Registry, TextEncoder};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Filter directive did not parse, or a global subscriber already exists
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Metrics could not be encoded
    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),
}

/// Install the global tracing subscriber described by `config`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    let (json_layer, pretty_layer) = match (config.console_output, config.json_logs) {
        (false, _) => (None, None),
        (true, true) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
            None,
        ),
        (true, false) => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "tracing initialized"
    );
    Ok(())
}

/// Encode every metric family in `registry` as Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
