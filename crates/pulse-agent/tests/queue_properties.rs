//! Property tests for the ingestion queue's conservation contract.

use proptest::prelude::*;
use pulse_agent::IngestionQueue;
use test_fixtures::sample_record;

#[derive(Debug, Clone)]
enum Op {
    Enqueue,
    Drain,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![3 => Just(Op::Enqueue), 1 => Just(Op::Drain)],
        0..200,
    )
}

proptest! {
    /// Total records drained equals total enqueued: no loss, no
    /// duplication, FIFO order, and no batch above the threshold.
    #[test]
    fn drained_records_conserve_enqueued(ops in ops(), threshold in 1usize..10) {
        let queue = IngestionQueue::new(threshold);
        let mut enqueued = 0i64;
        let mut drained = Vec::new();

        for op in ops {
            match op {
                Op::Enqueue => {
                    queue.enqueue(sample_record(enqueued));
                    enqueued += 1;
                }
                Op::Drain => {
                    if let Some(batch) = queue.drain_batch() {
                        prop_assert!(batch.len() <= threshold);
                        for record in batch.records {
                            drained.push(record.payload["seq"].as_i64().unwrap());
                        }
                    }
                }
            }
        }
        while let Some(batch) = queue.force_drain() {
            prop_assert!(batch.len() <= threshold);
            for record in batch.records {
                drained.push(record.payload["seq"].as_i64().unwrap());
            }
        }

        let expected: Vec<i64> = (0..enqueued).collect();
        prop_assert_eq!(drained, expected);
    }

    /// Enqueue reports the threshold exactly when the queue reaches it.
    #[test]
    fn enqueue_signals_only_at_threshold(threshold in 1usize..10) {
        let queue = IngestionQueue::new(threshold);
        for i in 0..threshold - 1 {
            prop_assert!(!queue.enqueue(sample_record(i as i64)));
        }
        prop_assert!(queue.enqueue(sample_record(threshold as i64)));
    }
}
