//! Ports Layer
//!
//! Traits the bridge depends on:
//! - `IdGenerator`: source of correlation identifiers
//! - `HostTransport`: the one-way channel to the host

pub mod id_generator;
pub mod transport;

pub use id_generator::{generate_id, IdGenerator, OsRngIdGenerator};
pub use transport::HostTransport;
