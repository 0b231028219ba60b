//! Identifier generation port.
//!
//! Correlation slots are only as unique as the identifiers behind them, so the
//! production generator draws from the operating system CSPRNG. The trait
//! exists so tests can script the sequence (e.g. to force a collision).

use crate::domain::identifier::Identifier;
use rand::rngs::OsRng;
use rand::RngCore;

/// Produces identifiers for callback slots.
pub trait IdGenerator: Send + Sync {
    /// Draw a fresh identifier. Must not block and must not fail; an
    /// exhausted entropy source is a fatal condition for the process.
    fn generate_id(&self) -> Identifier;
}

/// One 32-bit draw from the OS random source, rendered in decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngIdGenerator;

impl OsRngIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for OsRngIdGenerator {
    fn generate_id(&self) -> Identifier {
        Identifier::from_u32(OsRng.next_u32())
    }
}

/// Draw an identifier with the default generator.
pub fn generate_id() -> Identifier {
    OsRngIdGenerator.generate_id()
}
