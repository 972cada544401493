//! Bounded in-memory ingestion buffer.
//!
//! `enqueue` is synchronous and checks the flush threshold inside the same
//! lock, so the queue can never exceed the threshold before a flush is
//! scheduled. The drain step is the single critical section where record
//! ownership transfers from queue to batch: two concurrent drains can
//! never claim overlapping records.

use std::collections::VecDeque;
use std::sync::Mutex;

use pulse_core::{Batch, Record};

pub struct IngestionQueue {
    inner: Mutex<VecDeque<Record>>,
    threshold: usize,
}

impl IngestionQueue {
    pub fn new(threshold: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            threshold,
        }
    }

    /// Append a record. Returns `true` when the queue has reached the flush
    /// threshold and the caller must schedule an asynchronous flush.
    pub fn enqueue(&self, record: Record) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.push_back(record);
        inner.len() >= self.threshold
    }

    /// Atomically remove up to `threshold` records, FIFO, into a new batch.
    /// `None` when the queue is empty.
    pub fn drain_batch(&self) -> Option<Batch> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.is_empty() {
            return None;
        }
        let take = inner.len().min(self.threshold);
        let records: Vec<Record> = inner.drain(..take).collect();
        Some(Batch::new(records))
    }

    /// Drain whatever is queued, regardless of threshold. The only path
    /// that emits a smaller-than-threshold batch; used on shutdown.
    pub fn force_drain(&self) -> Option<Batch> {
        self.drain_batch()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::sample_record;

    #[test]
    fn enqueue_signals_at_threshold() {
        let queue = IngestionQueue::new(3);
        assert!(!queue.enqueue(sample_record(0)));
        assert!(!queue.enqueue(sample_record(1)));
        assert!(queue.enqueue(sample_record(2)));
    }

    #[test]
    fn drain_is_fifo_and_bounded() {
        let queue = IngestionQueue::new(3);
        for i in 0..5 {
            queue.enqueue(sample_record(i));
        }
        let batch = queue.drain_batch().unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.records[0].payload["seq"], 0);
        assert_eq!(batch.records[2].payload["seq"], 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn drain_empty_is_noop() {
        let queue = IngestionQueue::new(3);
        assert!(queue.drain_batch().is_none());
    }

    #[test]
    fn force_drain_emits_partial_batch() {
        let queue = IngestionQueue::new(5);
        queue.enqueue(sample_record(0));
        let batch = queue.force_drain().unwrap();
        assert_eq!(batch.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_drains_never_double_claim() {
        use std::sync::Arc;

        let queue = Arc::new(IngestionQueue::new(5));
        for i in 0..100 {
            queue.enqueue(sample_record(i));
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            handles.push(std::thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(batch) = queue.drain_batch() {
                    for record in batch.records {
                        seen.push(record.payload["seq"].as_i64().unwrap());
                    }
                }
                seen
            }));
        }

        let mut all: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<i64> = (0..100).collect();
        assert_eq!(all, expected);
    }
}
