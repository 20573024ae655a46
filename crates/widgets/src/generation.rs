//! Per-mount generation counter.
//!
//! Every rebuild request takes a [`RenderTicket`]. Lookups may complete out
//! of order; a ticket's result is applied only while it is still the newest
//! ticket for its mount, so the last request always wins.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::warn;

/// Proof of a rebuild request for one mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    mount_id: String,
    generation: u64,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
pub struct GenerationTracker {
    current: Mutex<HashMap<String, u64>>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.current.lock().unwrap_or_else(|poisoned| {
            warn!("Generation tracker mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Start a new rebuild for a mount, superseding any in flight.
    pub fn issue(&self, mount_id: &str) -> RenderTicket {
        let mut current = self.lock();
        let generation = current.entry(mount_id.to_string()).or_insert(0);
        *generation += 1;
        RenderTicket {
            mount_id: mount_id.to_string(),
            generation: *generation,
        }
    }

    /// Run `apply` only if the ticket is still current.
    ///
    /// The tracker stays locked while `apply` runs, so no newer ticket can be
    /// issued between the check and the write.
    pub fn apply_if_current<T>(
        &self,
        ticket: &RenderTicket,
        apply: impl FnOnce() -> T,
    ) -> Option<T> {
        let current = self.lock();
        if current.get(&ticket.mount_id).copied() != Some(ticket.generation) {
            return None;
        }
        let result = apply();
        drop(current);
        Some(result)
    }
}
