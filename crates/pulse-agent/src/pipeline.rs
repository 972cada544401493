//! Pipeline construction and lifecycle wiring.
//!
//! One [`Pipeline`] is constructed per process and owns all pipeline state
//! explicitly: identity, queue, coordinator, durable store. `start` wires
//! the collection timers and the host-event loop onto tokio tasks and
//! returns a [`PipelineHandle`] with explicit stop/shutdown.
//!
//! Constructing with `config = None` yields a disabled pipeline: every
//! entry point is a no-op, zero transport calls, zero store writes. That
//! is the feature gate, not a failure path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pulse_core::{
    DeviceIdentity, IEnvironmentProbe, IStateStore, ITransport, PipelineConfig, PipelineTuning,
    PulseResult, Record, Session,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::collect;
use crate::deliver::{
    DeliveryCoordinator, DeliveryOutcome, EnvelopeBuilder, FallbackTransport, PrimaryTransport,
};
use crate::identity::{derive_fingerprint, IdentityManager};
use crate::queue::IngestionQueue;
use crate::store::DurableRetryStore;

/// Environment events forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host became visible (`true`) or was hidden (`false`).
    VisibilityChanged(bool),
    /// Connectivity came back; triggers a retry pass.
    ConnectivityRestored,
    /// The host is going away; best-effort final collection and flush.
    Shutdown,
}

struct PipelineContext {
    tuning: PipelineTuning,
    session: Session,
    device: DeviceIdentity,
    probe: Arc<dyn IEnvironmentProbe>,
    queue: IngestionQueue,
    coordinator: DeliveryCoordinator,
    visible: AtomicBool,
}

/// The top-level pipeline coordinator.
pub struct Pipeline {
    context: Option<Arc<PipelineContext>>,
}

impl Pipeline {
    /// Build a pipeline with the production HTTP transports.
    pub fn new(
        config: Option<PipelineConfig>,
        store: Arc<dyn IStateStore>,
        probe: Arc<dyn IEnvironmentProbe>,
    ) -> PulseResult<Self> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };
        let timeout = Duration::from_secs(config.tuning.request_timeout_secs);
        let primary: Arc<dyn ITransport> =
            Arc::new(PrimaryTransport::new(&config.endpoints.primary_url, timeout)?);
        let fallback: Arc<dyn ITransport> =
            Arc::new(FallbackTransport::new(&config.endpoints.fallback_url, timeout)?);
        Self::with_transports(Some(config), store, probe, primary, fallback)
    }

    /// Build a pipeline with injected transports. Test seam; also used by
    /// hosts with bespoke channels.
    pub fn with_transports(
        config: Option<PipelineConfig>,
        store: Arc<dyn IStateStore>,
        probe: Arc<dyn IEnvironmentProbe>,
        primary: Arc<dyn ITransport>,
        fallback: Arc<dyn ITransport>,
    ) -> PulseResult<Self> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };

        let identity = IdentityManager::new(store.clone());
        let device = match identity.get_or_create_device_id(probe.as_ref()) {
            Ok(device) => device,
            Err(e) => {
                // Run with an unpersisted token rather than refusing to start.
                tracing::warn!("pipeline: device identity store unavailable: {e}");
                DeviceIdentity {
                    id: derive_fingerprint(probe.as_ref()),
                    created_at: chrono::Utc::now(),
                }
            }
        };
        let session = identity.new_session_id();

        let tuning = config.tuning.clone();
        let encoder = EnvelopeBuilder::new(&config, &device.id);
        let retry_store = DurableRetryStore::new(store, tuning.store_capacity);
        let coordinator = DeliveryCoordinator::new(
            primary,
            fallback,
            retry_store,
            encoder,
            Duration::from_millis(tuning.retry_spacing_ms),
        );

        tracing::info!(session = %session.id, "pipeline: initialized");
        Ok(Self {
            context: Some(Arc::new(PipelineContext {
                queue: IngestionQueue::new(tuning.flush_threshold),
                tuning,
                session,
                device,
                probe,
                coordinator,
                visible: AtomicBool::new(true),
            })),
        })
    }

    /// The no-op pipeline used when the host supplies no configuration.
    pub fn disabled() -> Self {
        tracing::info!("pipeline: no configuration supplied, disabled");
        Self { context: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.context.is_some()
    }

    /// One-shot environment collection. Fire-and-forget; no-op when
    /// disabled.
    pub fn collect_environment_now(&self) {
        if let Some(ctx) = &self.context {
            let record = collect::collect_environment(ctx.probe.as_ref(), &ctx.session, &ctx.device);
            submit(ctx, record);
        }
    }

    /// Immediate activity collection. Fire-and-forget; no-op when disabled.
    pub fn collect_activity_now(&self) {
        if let Some(ctx) = &self.context {
            let record = collect::collect_activity(ctx.probe.as_ref(), &ctx.session, &ctx.device);
            submit(ctx, record);
        }
    }

    /// Spawn the collection timers and the host-event loop.
    pub fn start(self) -> PipelineHandle {
        let Some(ctx) = self.context else {
            let (events, _closed) = mpsc::unbounded_channel();
            return PipelineHandle {
                events,
                timer_tasks: Vec::new(),
                event_task: None,
            };
        };

        let (events, rx) = mpsc::unbounded_channel();
        let mut timer_tasks = Vec::new();

        // One-shot environment collection after the start delay.
        {
            let ctx = ctx.clone();
            timer_tasks.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(ctx.tuning.environment_delay_secs)).await;
                let record =
                    collect::collect_environment(ctx.probe.as_ref(), &ctx.session, &ctx.device);
                submit(&ctx, record);
            }));
        }

        // Recurring activity collection while visible. The interval keeps
        // its cadence across visibility changes; hidden ticks emit nothing.
        {
            let ctx = ctx.clone();
            timer_tasks.push(tokio::spawn(async move {
                let period = Duration::from_secs(ctx.tuning.activity_interval_secs);
                let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    if ctx.visible.load(Ordering::Relaxed) {
                        let record =
                            collect::collect_activity(ctx.probe.as_ref(), &ctx.session, &ctx.device);
                        submit(&ctx, record);
                    }
                }
            }));
        }

        // Host-event loop.
        let event_task = tokio::spawn(event_loop(ctx, rx));

        PipelineHandle {
            events,
            timer_tasks,
            event_task: Some(event_task),
        }
    }
}

/// Running pipeline: event sender plus the spawned tasks.
pub struct PipelineHandle {
    events: mpsc::UnboundedSender<HostEvent>,
    timer_tasks: Vec<JoinHandle<()>>,
    event_task: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Forward a host event. Fire-and-forget; a stopped or disabled
    /// pipeline ignores it.
    pub fn notify(&self, event: HostEvent) {
        let _ = self.events.send(event);
    }

    /// Best-effort graceful shutdown: final activity collection, forced
    /// drain, then task teardown.
    pub async fn shutdown(mut self) {
        let _ = self.events.send(HostEvent::Shutdown);
        if let Some(task) = self.event_task.take() {
            let _ = task.await;
        }
        for task in self.timer_tasks.drain(..) {
            task.abort();
        }
    }

    /// Immediate teardown without the final collection.
    pub fn stop(mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
        for task in self.timer_tasks.drain(..) {
            task.abort();
        }
    }
}

async fn event_loop(ctx: Arc<PipelineContext>, mut rx: mpsc::UnboundedReceiver<HostEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            HostEvent::VisibilityChanged(visible) => {
                ctx.visible.store(visible, Ordering::Relaxed);
                if visible {
                    // Resume with one immediate collection, slightly
                    // deferred so the host settles first.
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(
                            ctx.tuning.visibility_resume_delay_ms,
                        ))
                        .await;
                        let record = collect::collect_activity(
                            ctx.probe.as_ref(),
                            &ctx.session,
                            &ctx.device,
                        );
                        submit(&ctx, record);
                    });
                }
            }
            HostEvent::ConnectivityRestored => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    ctx.coordinator.retry_pending().await;
                });
            }
            HostEvent::Shutdown => {
                tracing::debug!("pipeline: shutting down");
                let record =
                    collect::collect_activity(ctx.probe.as_ref(), &ctx.session, &ctx.device);
                ctx.queue.enqueue(record);
                while let Some(batch) = ctx.queue.force_drain() {
                    ctx.coordinator.deliver(batch).await;
                }
                break;
            }
        }
    }
}

/// Enqueue a record; when the flush threshold is reached, schedule the
/// asynchronous flush. Enqueue itself never suspends, so collector timers
/// are never blocked by an in-flight delivery.
fn submit(ctx: &Arc<PipelineContext>, record: Record) {
    if ctx.queue.enqueue(record) {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            flush(&ctx).await;
        });
    }
}

async fn flush(ctx: &Arc<PipelineContext>) {
    let Some(batch) = ctx.queue.drain_batch() else {
        return;
    };
    let outcome = ctx.coordinator.deliver(batch).await;
    if outcome == DeliveryOutcome::Persisted {
        // One scheduled retry pass per persist event.
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(ctx.tuning.retry_delay_secs)).await;
            ctx.coordinator.retry_pending().await;
        });
    }
}
