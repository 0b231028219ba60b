//! Correlation identifiers and the slot names derived from them.
//!
//! An [`Identifier`] is the decimal rendering of one random 32-bit value. The
//! host never sees it directly: every registry slot lives under the
//! [`SlotName`] obtained by prefixing the identifier with [`SLOT_PREFIX`], and
//! the host calls back using that derived name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix joining an identifier to its slot name.
///
/// Shared with the host side; changing it breaks every host that replies
/// to `"_" + id`.
pub const SLOT_PREFIX: &str = "_";

/// Opaque correlation token.
///
/// Only equality and hashing are meaningful. Two identifiers drawn from the
/// same generator are expected, not guaranteed, to differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Render a raw 32-bit draw as an identifier.
    pub fn from_u32(raw: u32) -> Self {
        Self(raw.to_string())
    }

    /// Derive the registry slot name for this identifier.
    pub fn slot_name(&self) -> SlotName {
        SlotName(format!("{}{}", SLOT_PREFIX, self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for Identifier {
    fn from(raw: u32) -> Self {
        Self::from_u32(raw)
    }
}

/// Name under which a callback slot is installed in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotName(String);

impl SlotName {
    /// Wrap a name received from the host.
    ///
    /// No validation is done here: a name that was never issued simply
    /// matches no live slot.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the identifier if this name follows the prefix rule.
    pub fn identifier(&self) -> Option<Identifier> {
        self.0
            .strip_prefix(SLOT_PREFIX)
            .filter(|rest| !rest.is_empty())
            .map(|rest| Identifier(rest.to_string()))
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Identifier> for SlotName {
    fn from(id: &Identifier) -> Self {
        id.slot_name()
    }
}

impl AsRef<str> for SlotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
