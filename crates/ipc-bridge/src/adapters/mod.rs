//! Adapters Layer
//!
//! Concrete host transports.

pub mod channel;

pub use channel::{ChannelTransport, JsonChannelTransport};
