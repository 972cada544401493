//! Durable retry store: a bounded, persistent log of undelivered batches.
//!
//! Backed by one [`IStateStore`] key holding a JSON array of
//! [`PendingEntry`]. Overflow bulk-evicts the oldest entries in one
//! operation, keeping the most recent `ceil(capacity / 2)`; a forced
//! eviction never leaves the store empty.

mod file_store;

pub use file_store::FileStateStore;

use std::sync::Arc;

use pulse_core::constants::PENDING_KEY;
use pulse_core::errors::PersistenceError;
use pulse_core::{Batch, IStateStore, PendingEntry};
use uuid::Uuid;

pub struct DurableRetryStore {
    store: Arc<dyn IStateStore>,
    capacity: usize,
}

impl DurableRetryStore {
    pub fn new(store: Arc<dyn IStateStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Load all pending entries in insertion order. Unreadable or corrupt
    /// contents are treated as an empty log (logged at warn): the retry
    /// log is best-effort by design and must never poison the pipeline.
    pub fn load(&self) -> Vec<PendingEntry> {
        let raw = match self.store.get(PENDING_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("store: pending log unreadable, treating as empty: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("store: pending log corrupt, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Append a batch that exhausted all transports.
    pub fn persist(&self, batch: Batch) -> Result<(), PersistenceError> {
        let mut entries = self.load();
        entries.push(PendingEntry::new(batch));

        if entries.len() > self.capacity {
            let keep = self.capacity.div_ceil(2);
            let evicted = entries.len() - keep;
            entries.drain(..evicted);
            tracing::warn!("store: capacity {} exceeded, evicted {evicted} oldest entries", self.capacity);
        }

        self.save(&entries)
    }

    /// Settle a retry pass against the live log: delivered entries are
    /// removed by id, retried entries keep their place with counters
    /// bumped, and entries persisted while the pass ran are untouched.
    pub fn settle_pass(&self, delivered: &[Uuid], retried: &[Uuid]) -> Result<(), PersistenceError> {
        let mut entries = self.load();
        entries.retain(|entry| !delivered.contains(&entry.id));
        for entry in &mut entries {
            if retried.contains(&entry.id) {
                entry.attempts += 1;
                entry.batch.attempt += 1;
            }
        }
        self.save(&entries)
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn save(&self, entries: &[PendingEntry]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(entries).map_err(|e| PersistenceError::WriteFailed {
            key: PENDING_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(PENDING_KEY, &raw)
    }
}
