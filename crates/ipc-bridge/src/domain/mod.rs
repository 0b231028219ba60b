//! Domain types for the IPC bridge.
//!
//! Pure data: identifiers, the call envelope and configuration. The slot
//! namespace and pending calls live at the crate root.

pub mod config;
pub mod envelope;
pub mod identifier;

pub use config::BridgeConfig;
pub use envelope::{normalize_args, CallEnvelope};
pub use identifier::{Identifier, SlotName, SLOT_PREFIX};
