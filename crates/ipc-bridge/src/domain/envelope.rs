//! Call envelope posted to the host transport.
//!
//! Wire shape (JSON):
//!
//! ```text
//! {
//!   "cmd":       <command name>,
//!   "result_id": <success slot name>,
//!   "error_id":  <error slot name>,
//!   "payload":   [<arg>, ...]
//! }
//! ```
//!
//! Nothing else travels with a call: no timestamp, no protocol version.

use crate::domain::identifier::SlotName;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One command request, stateless from the host's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallEnvelope {
    /// Command name
    pub cmd: String,
    /// Slot the host invokes on success
    pub result_id: SlotName,
    /// Slot the host invokes on failure
    pub error_id: SlotName,
    /// Positional arguments
    #[serde(default)]
    pub payload: Vec<Value>,
}

impl CallEnvelope {
    pub fn new(
        cmd: impl Into<String>,
        result_id: SlotName,
        error_id: SlotName,
        payload: Vec<Value>,
    ) -> Self {
        Self {
            cmd: cmd.into(),
            result_id,
            error_id,
            payload,
        }
    }

    /// Encode for transports that carry text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a message received on the host side.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Turn loosely shaped call arguments into a positional payload.
///
/// - `null` becomes an empty payload
/// - an array is used element by element
/// - any other value becomes a single argument
pub fn normalize_args(args: Value) -> Vec<Value> {
    match args {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}
