//! Bridge configuration with validation.
//!
//! # Example
//!
//! ```ignore
//! use ipc_bridge::BridgeConfig;
//! use std::time::Duration;
//!
//! let config = BridgeConfig::default().with_call_timeout(Duration::from_secs(10));
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable holding the optional call timeout (`"10s"`, `"250ms"`).
pub const CALL_TIMEOUT_ENV: &str = "BRIDGE_CALL_TIMEOUT";

/// Runtime options for [`crate::IpcBridge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deadline applied to every call. `None` waits for the host forever.
    #[serde(with = "humantime_serde")]
    pub call_timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Read configuration from the environment.
    ///
    /// - `BRIDGE_CALL_TIMEOUT`: humantime duration, unset means no timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        let call_timeout = match env::var(CALL_TIMEOUT_ENV) {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        let config = Self { call_timeout };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.call_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "call timeout cannot be 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Builder-style method to set the call timeout
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(raw.trim()).map_err(|_| {
        ConfigError::InvalidEnv {
            key: CALL_TIMEOUT_ENV.to_string(),
            value: raw.to_string(),
        }
    })
}
