//! Delivery coordinator: tiered transports plus the durable retry pass.
//!
//! Transport order is strict: the primary channel is the only one whose
//! response defines success; the fallback is attempted best-effort and a
//! non-confirmed batch is persisted regardless of the fallback's outcome.
//! Production callers ignore the returned [`DeliveryOutcome`]; tests
//! assert it.

mod fallback;
mod payload;
mod primary;

pub use fallback::FallbackTransport;
pub use payload::EnvelopeBuilder;
pub use primary::PrimaryTransport;

use std::sync::Arc;
use std::time::Duration;

use pulse_core::{Batch, ITransport};
use tokio::sync::Mutex;

use crate::store::DurableRetryStore;

/// Terminal state of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The primary channel confirmed receipt.
    Delivered,
    /// Not confirmed; the batch now sits in the durable retry store.
    Persisted,
    /// Not confirmed and the durable write failed. Accepted data loss.
    Dropped,
}

pub struct DeliveryCoordinator {
    primary: Arc<dyn ITransport>,
    fallback: Arc<dyn ITransport>,
    store: DurableRetryStore,
    encoder: EnvelopeBuilder,
    retry_spacing: Duration,
    /// Retry passes are strictly sequential; concurrent triggers queue here.
    retry_guard: Mutex<()>,
}

impl DeliveryCoordinator {
    pub fn new(
        primary: Arc<dyn ITransport>,
        fallback: Arc<dyn ITransport>,
        store: DurableRetryStore,
        encoder: EnvelopeBuilder,
        retry_spacing: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            store,
            encoder,
            retry_spacing,
            retry_guard: Mutex::new(()),
        }
    }

    /// Try the transport tiers in priority order for one batch.
    pub async fn deliver(&self, mut batch: Batch) -> DeliveryOutcome {
        batch.attempt += 1;
        let envelope = self.encoder.build(&batch);

        match self.primary.send(&envelope).await {
            Ok(receipt) if receipt.confirmed => {
                tracing::debug!("deliver: batch of {} confirmed by primary", batch.len());
                return DeliveryOutcome::Delivered;
            }
            Ok(_) => tracing::debug!("deliver: primary receipt unconfirmed"),
            Err(e) => tracing::debug!("deliver: primary transport failed: {e}"),
        }

        // Best-effort second tier. Its outcome augments but never replaces
        // persistence.
        if let Err(e) = self.fallback.send(&envelope).await {
            tracing::debug!("deliver: fallback transport failed: {e}");
        }

        match self.store.persist(batch) {
            Ok(()) => DeliveryOutcome::Persisted,
            Err(e) => {
                tracing::warn!("deliver: durable persist failed, dropping batch: {e}");
                DeliveryOutcome::Dropped
            }
        }
    }

    /// Retry every pending entry sequentially, primary transport only,
    /// separated by the configured spacing. Successes are removed by id;
    /// failures remain for the next pass with their attempt count bumped.
    /// Entries persisted while the pass runs are left alone. Returns the
    /// number of entries delivered.
    pub async fn retry_pending(&self) -> usize {
        let _guard = self.retry_guard.lock().await;

        let entries = self.store.load();
        if entries.is_empty() {
            return 0;
        }
        tracing::debug!("retry: attempting {} pending entries", entries.len());

        let mut delivered_ids = Vec::new();
        let mut retried_ids = Vec::new();
        for (i, mut entry) in entries.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.retry_spacing).await;
            }
            entry.batch.attempt += 1;
            let envelope = self.encoder.build(&entry.batch);
            match self.primary.send(&envelope).await {
                Ok(receipt) if receipt.confirmed => delivered_ids.push(entry.id),
                Ok(_) | Err(_) => retried_ids.push(entry.id),
            }
        }

        if let Err(e) = self.store.settle_pass(&delivered_ids, &retried_ids) {
            tracing::warn!("retry: failed to rewrite pending log: {e}");
        }
        let delivered = delivered_ids.len();
        tracing::debug!("retry: delivered {delivered}, {} failed", retried_ids.len());
        delivered
    }

    /// Pending entries currently awaiting retry.
    pub fn pending_len(&self) -> usize {
        self.store.len()
    }
}
