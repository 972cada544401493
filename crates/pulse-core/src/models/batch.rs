use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// A bounded group of records submitted together to a transport attempt.
///
/// Created at queue drain time; drain is the single point where record
/// ownership transfers from the queue into a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub records: Vec<Record>,
    pub created_at: DateTime<Utc>,
    /// Delivery attempts made so far, including the initial one.
    pub attempt: u32,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            created_at: Utc::now(),
            attempt: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
