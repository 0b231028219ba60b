//! Error types for the IPC bridge.

use crate::domain::identifier::SlotName;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a pending call rejected.
#[derive(Debug, Error)]
pub enum CallError {
    /// No host transport is attached; nothing was registered.
    #[error("IPC bridge unavailable")]
    BridgeUnavailable,

    /// The host invoked the error slot. The value is passed through untouched.
    #[error("host reported error: {0}")]
    Host(Value),

    /// The transport refused the envelope; both slots were released.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Opt-in deadline elapsed before the host answered.
    #[error("no response from host within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The slots were dropped without either being invoked.
    #[error("call abandoned before the host responded")]
    Abandoned,

    /// Arguments could not be turned into a payload.
    #[error("failed to encode call arguments: {0}")]
    Encode(#[source] serde_json::Error),

    /// The host result did not match the requested type.
    #[error("failed to decode host result: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CallError {
    /// The raw host error, if this rejection came from the error slot.
    pub fn host_value(&self) -> Option<&Value> {
        match self {
            CallError::Host(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_host_value(self) -> Option<Value> {
        match self {
            CallError::Host(value) => Some(value),
            _ => None,
        }
    }
}

/// Errors from the callback namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("slot already installed: {0}")]
    SlotOccupied(SlotName),

    #[error("no live slot named {0}")]
    UnknownSlot(SlotName),
}

/// Errors raised by a host transport when posting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("channel closed")]
    ChannelClosed,

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Result alias for awaited calls.
pub type CallResult<T = Value> = Result<T, CallError>;
