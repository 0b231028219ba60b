//! # IPC Bridge - request/response over a one-way host channel
//!
//! A sandboxed environment can only post messages to its host; the host
//! cannot return values. This crate simulates a call by registering two
//! named callback slots (success and error), naming them in the posted
//! envelope, and settling a future when the host invokes one of them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    IpcBridge::invoke                     │
//! │                                                          │
//! │  ┌──────────────────┐        ┌────────────────────────┐  │
//! │  │ CallbackRegistry │ ◄───── │ IdGenerator (OS RNG)   │  │
//! │  │  "_<id>" → slot  │        └────────────────────────┘  │
//! │  └────────┬─────────┘                                    │
//! │           │ result_id / error_id                         │
//! │  ┌────────┴─────────┐        ┌────────────────────────┐  │
//! │  │   CallEnvelope   │ ─────► │ HostTransport (1-way)  │  │
//! │  └──────────────────┘        └───────────┬────────────┘  │
//! └──────────────────────────────────────────┼───────────────┘
//!                                            ▼
//!                                          Host
//!                                            │
//!        CallbackRegistry::invoke_slot ◄─────┘ (later)
//!                    │
//!                    ▼
//!              PendingCall settles
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use ipc_bridge::{CallbackRegistry, ChannelTransport, IpcBridge};
//! use std::sync::Arc;
//!
//! let (transport, mut host_rx) = ChannelTransport::channel();
//! let registry = Arc::new(CallbackRegistry::new());
//! let bridge = IpcBridge::with_transport(registry.clone(), Arc::new(transport));
//!
//! let call = bridge.invoke("ping", vec![1.into(), 2.into()]);
//!
//! // host side
//! let envelope = host_rx.recv().await.unwrap();
//! registry.invoke_slot(&envelope.result_id, "pong".into())?;
//!
//! assert_eq!(call.await?, "pong");
//! ```
//!
//! ## Guarantees
//!
//! - One-shot slots leave the namespace before their callback runs
//! - Installed slots are never overwritten
//! - A call settles at most once; later slot invocations are ignored
//! - No timeout unless configured: a silent host leaves the call pending

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod pending;
pub mod ports;
pub mod registry;
pub mod service;

// Re-exports for public API
pub use adapters::{ChannelTransport, JsonChannelTransport};
pub use domain::{normalize_args, BridgeConfig, CallEnvelope, Identifier, SlotName, SLOT_PREFIX};
pub use error::{CallError, CallResult, ConfigError, RegistryError, TransportError};
pub use pending::{CallSlots, PendingCall};
pub use ports::{generate_id, HostTransport, IdGenerator, OsRngIdGenerator};
pub use registry::{CallbackRegistry, RegistryStats, SlotCallback};
pub use service::{IpcBridge, ENVELOPE_TARGET};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
