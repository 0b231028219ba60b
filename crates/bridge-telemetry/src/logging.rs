//! Subscriber setup and logging helpers.

use crate::{TelemetryConfig, TelemetryError};
use ipc_bridge::ENVELOPE_TARGET;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the level filter for `config`.
///
/// Envelope logging adds a debug directive for the envelope target on top
/// of the configured level.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level {:?}: {}", config.log_level, e)))?;

    if !config.log_envelopes {
        return Ok(filter);
    }

    let directive: Directive = format!("{}=debug", ENVELOPE_TARGET)
        .parse()
        .map_err(|e| TelemetryError::Config(format!("envelope directive: {}", e)))?;
    Ok(filter.add_directive(directive))
}

/// Install the global subscriber.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    let output = if !config.console_output {
        None
    } else if config.json_logs {
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .boxed(),
        )
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(true)
                .boxed(),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        log_envelopes = config.log_envelopes,
        "Logging initialized"
    );
    Ok(())
}

/// Log a call-related event with standard fields.
#[macro_export]
macro_rules! log_call_event {
    ($level:ident, $cmd:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "ipc-bridge",
            cmd = $cmd,
            $($($field)*,)?
            $msg
        )
    };
}
