//! Callback Registry - named, externally invokable response slots.
//!
//! Maps slot names to callbacks so the host can deliver a value back into
//! this process by name.
//!
//! Flow:
//! 1. Caller registers a callback and gets an [`Identifier`]
//! 2. The derived [`SlotName`] is handed to the host inside an envelope
//! 3. The host calls [`CallbackRegistry::invoke_slot`] with that name
//! 4. One-shot slots are removed first, then the callback runs
//!
//! Installed slots are never replaced. Only the registry removes them.

use crate::domain::identifier::{Identifier, SlotName};
use crate::error::RegistryError;
use crate::ports::{IdGenerator, OsRngIdGenerator};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Single-argument callback bound to a slot.
pub type SlotCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// An installed slot
struct Slot {
    /// Bound callback; `None` makes invocation a pure cleanup
    callback: Option<SlotCallback>,
    /// Remove on first invocation
    once: bool,
    /// When the slot was installed (for logging)
    installed_at: Instant,
}

/// Counters for the registry
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Slots installed
    pub total_registered: AtomicU64,
    /// Slot invocations that found a live slot
    pub total_invoked: AtomicU64,
    /// Slots removed (one-shot invocation or explicit removal)
    pub total_removed: AtomicU64,
    /// Invocations of names with no live slot
    pub total_unknown: AtomicU64,
    /// Generated identifiers that hit a live slot and were redrawn
    pub total_collisions: AtomicU64,
}

/// Namespace of callback slots.
///
/// Owned by whoever builds the bridge and shared through `Arc`; there is no
/// process-wide instance.
pub struct CallbackRegistry {
    /// Slot name to slot
    slots: DashMap<SlotName, Slot>,
    /// Source of identifiers
    id_gen: Arc<dyn IdGenerator>,
    /// Statistics
    stats: Arc<RegistryStats>,
}

impl CallbackRegistry {
    /// Create an empty registry drawing identifiers from the OS RNG.
    pub fn new() -> Self {
        Self::with_generator(Arc::new(OsRngIdGenerator::new()))
    }

    /// Create an empty registry with a custom identifier source.
    pub fn with_generator(id_gen: Arc<dyn IdGenerator>) -> Self {
        Self {
            slots: DashMap::new(),
            id_gen,
            stats: Arc::new(RegistryStats::default()),
        }
    }

    /// Bind `callback` to a fresh identifier and install its slot.
    ///
    /// Returns the identifier, not the slot name; derive the name with
    /// [`Identifier::slot_name`]. An identifier whose slot is already live
    /// is discarded and redrawn.
    pub fn register(&self, callback: Option<SlotCallback>, once: bool) -> Identifier {
        loop {
            let id = self.id_gen.generate_id();
            match self.install(id.slot_name(), callback.clone(), once) {
                Ok(()) => return id,
                Err(err) => {
                    self.stats.total_collisions.fetch_add(1, Ordering::Relaxed);
                    debug!(error = %err, "Identifier collided with a live slot, redrawing");
                }
            }
        }
    }

    /// Register a callback that is removed on its first invocation.
    pub fn register_once<F>(&self, callback: F) -> Identifier
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.register(Some(Arc::new(callback)), true)
    }

    /// Register a callback that stays until [`remove`](Self::remove) is called.
    pub fn register_persistent<F>(&self, callback: F) -> Identifier
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.register(Some(Arc::new(callback)), false)
    }

    /// Install a slot under an explicit name.
    ///
    /// Fails with [`RegistryError::SlotOccupied`] if the name is live; the
    /// existing slot is left untouched.
    pub fn install(
        &self,
        name: SlotName,
        callback: Option<SlotCallback>,
        once: bool,
    ) -> Result<(), RegistryError> {
        match self.slots.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::SlotOccupied(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(slot = %entry.key(), once = once, "Installed callback slot");
                entry.insert(Slot {
                    callback,
                    once,
                    installed_at: Instant::now(),
                });
                self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    /// Deliver `result` to the slot named `name`.
    ///
    /// A one-shot slot is out of the namespace before its callback starts, so
    /// a re-entrant or concurrent second delivery finds nothing. No
    /// namespace lock is held while the callback runs.
    pub fn invoke_slot(&self, name: &SlotName, result: Value) -> Result<(), RegistryError> {
        let callback = if let Some((_, slot)) = self.slots.remove_if(name, |_, slot| slot.once) {
            self.stats.total_removed.fetch_add(1, Ordering::Relaxed);
            debug!(
                slot = %name,
                age_ms = slot.installed_at.elapsed().as_millis(),
                "Released one-shot slot"
            );
            slot.callback
        } else if let Some(slot) = self.slots.get(name) {
            slot.callback.clone()
        } else {
            self.stats.total_unknown.fetch_add(1, Ordering::Relaxed);
            warn!(slot = %name, "Invocation of unknown or released slot");
            return Err(RegistryError::UnknownSlot(name.clone()));
        };

        self.stats.total_invoked.fetch_add(1, Ordering::Relaxed);
        if let Some(callback) = callback {
            callback(result);
        }
        Ok(())
    }

    /// Remove a slot without invoking it. Returns false if it was not live.
    pub fn remove(&self, name: &SlotName) -> bool {
        if self.slots.remove(name).is_some() {
            self.stats.total_removed.fetch_add(1, Ordering::Relaxed);
            debug!(slot = %name, "Removed callback slot");
            true
        } else {
            false
        }
    }

    /// Drop every live slot without invoking it. Returns how many were removed.
    ///
    /// Calls waiting on a cleared slot pair reject with
    /// [`CallError::Abandoned`](crate::CallError::Abandoned).
    pub fn clear(&self) -> usize {
        let mut removed = 0usize;
        self.slots.retain(|_, _| {
            removed += 1;
            false
        });
        self.stats
            .total_removed
            .fetch_add(removed as u64, Ordering::Relaxed);
        debug!(removed = removed, "Cleared callback registry");
        removed
    }

    /// Check if a slot is live
    pub fn contains(&self, name: &SlotName) -> bool {
        self.slots.contains_key(name)
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get statistics
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("live_slots", &self.slots.len())
            .field("stats", &self.stats)
            .finish()
    }
}
