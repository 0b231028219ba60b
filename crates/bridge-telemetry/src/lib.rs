//! # Bridge Telemetry
//!
//! Structured logging for processes embedding the IPC bridge.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BRIDGE_SERVICE_NAME` | `ipc-bridge` | Service name in logs |
//! | `BRIDGE_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `BRIDGE_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `BRIDGE_JSON_LOGS` | `false` | JSON formatted logs |
//! | `BRIDGE_LOG_ENVELOPES` | `false` | Log every outgoing call envelope |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging.
///
/// Returns a guard to hold for the lifetime of the application. Fails with
/// [`TelemetryError::SubscriberInit`] if a global subscriber already exists.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
