use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Batch;

/// One undelivered batch awaiting retry in the durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEntry {
    /// Stable key a retry pass uses to settle its result against the
    /// live log, which may have grown since the pass snapshotted it.
    pub id: Uuid,
    pub batch: Batch,
    pub saved_at: DateTime<Utc>,
    /// Retry passes that have already failed for this entry.
    pub attempts: u32,
}

impl PendingEntry {
    pub fn new(batch: Batch) -> Self {
        Self {
            id: Uuid::new_v4(),
            batch,
            saved_at: Utc::now(),
            attempts: 0,
        }
    }
}
