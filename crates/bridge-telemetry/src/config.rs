//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name reported by the startup and shutdown events
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to format logs as JSON
    pub json_logs: bool,

    /// Emit every outgoing call envelope at debug level
    pub log_envelopes: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ipc-bridge".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            log_envelopes: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BRIDGE_SERVICE_NAME`: Service name (default: ipc-bridge)
    /// - `BRIDGE_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `BRIDGE_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `BRIDGE_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `BRIDGE_LOG_ENVELOPES`: Log outgoing envelopes (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("BRIDGE_SERVICE_NAME")
                .unwrap_or_else(|_| "ipc-bridge".to_string()),

            log_level: env::var("BRIDGE_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("BRIDGE_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("BRIDGE_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            log_envelopes: env::var("BRIDGE_LOG_ENVELOPES")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Builder-style method to set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Builder-style method to toggle envelope logging
    pub fn with_envelope_logging(mut self, enabled: bool) -> Self {
        self.log_envelopes = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
