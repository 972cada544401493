//! End-to-end pipeline scenarios under a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use pulse_agent::{HostEvent, Pipeline};
use pulse_core::PipelineConfig;
use test_fixtures::{sample_config, FixedProbe, MemoryStateStore, ScriptedTransport};

fn fast_config() -> PipelineConfig {
    let mut config = sample_config();
    config.tuning.flush_threshold = 1;
    config.tuning.environment_delay_secs = 2;
    config.tuning.activity_interval_secs = 30;
    config.tuning.visibility_resume_delay_ms = 1000;
    config.tuning.retry_delay_secs = 60;
    config.tuning.retry_spacing_ms = 1000;
    config
}

/// Let spawned flush/delivery tasks run and the mock clock advance.
async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn missing_config_disables_every_entry_point() {
    let store = Arc::new(MemoryStateStore::new());
    let primary = Arc::new(ScriptedTransport::always_confirming());
    let fallback = Arc::new(ScriptedTransport::always_confirming());

    let pipeline = Pipeline::with_transports(
        None,
        store.clone(),
        Arc::new(FixedProbe::default()),
        primary.clone(),
        fallback.clone(),
    )
    .unwrap();
    assert!(!pipeline.is_enabled());

    pipeline.collect_environment_now();
    pipeline.collect_activity_now();
    let handle = pipeline.start();
    handle.notify(HostEvent::VisibilityChanged(true));
    handle.notify(HostEvent::ConnectivityRestored);
    settle(Duration::from_secs(120)).await;
    handle.shutdown().await;

    assert_eq!(primary.sent_count(), 0);
    assert_eq!(fallback.sent_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn hidden_ticks_emit_nothing_and_visibility_regain_resumes() {
    let primary = Arc::new(ScriptedTransport::always_confirming());
    let fallback = Arc::new(ScriptedTransport::always_failing());

    let pipeline = Pipeline::with_transports(
        Some(fast_config()),
        Arc::new(MemoryStateStore::new()),
        Arc::new(FixedProbe::default()),
        primary.clone(),
        fallback,
    )
    .unwrap();
    let handle = pipeline.start();

    handle.notify(HostEvent::VisibilityChanged(false));
    settle(Duration::from_millis(10)).await;

    // Environment one-shot still fires at 2s; threshold 1 delivers it.
    settle(Duration::from_secs(3)).await;
    assert_eq!(primary.sent_count(), 1);

    // The 30s activity tick passes while hidden: nothing emitted.
    settle(Duration::from_secs(30)).await;
    assert_eq!(primary.sent_count(), 1);

    // Visibility regained: exactly one immediate record after the resume
    // delay.
    handle.notify(HostEvent::VisibilityChanged(true));
    settle(Duration::from_millis(1100)).await;
    assert_eq!(primary.sent_count(), 2);

    // Interval cadence resumes on its own schedule (next tick at t=60s).
    settle(Duration::from_secs(30)).await;
    assert_eq!(primary.sent_count(), 3);

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn shutdown_flushes_a_partial_batch() {
    let mut config = sample_config();
    config.tuning.flush_threshold = 5;
    let primary = Arc::new(ScriptedTransport::always_confirming());

    let pipeline = Pipeline::with_transports(
        Some(config),
        Arc::new(MemoryStateStore::new()),
        Arc::new(FixedProbe::default()),
        primary.clone(),
        Arc::new(ScriptedTransport::always_failing()),
    )
    .unwrap();

    pipeline.collect_activity_now();
    pipeline.collect_activity_now();
    assert_eq!(primary.sent_count(), 0);

    let handle = pipeline.start();
    handle.shutdown().await;

    // Final best-effort collection joins the two queued records; the
    // forced drain emits them as one sub-threshold batch.
    assert_eq!(primary.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn persisted_batch_retries_after_the_scheduled_delay() {
    let primary = Arc::new(ScriptedTransport::always_confirming());
    let fallback = Arc::new(ScriptedTransport::always_failing());

    let pipeline = Pipeline::with_transports(
        Some(fast_config()),
        Arc::new(MemoryStateStore::new()),
        Arc::new(FixedProbe::default()),
        primary.clone(),
        fallback.clone(),
    )
    .unwrap();

    // Primary down for the first flush: the batch lands in the durable
    // store and one retry pass is scheduled.
    primary.fail_next(1);
    pipeline.collect_activity_now();
    settle(Duration::from_millis(10)).await;
    assert_eq!(primary.sent_count(), 1);
    assert_eq!(fallback.sent_count(), 1);

    // Nothing fires ahead of the scheduled delay.
    settle(Duration::from_secs(30)).await;
    assert_eq!(primary.sent_count(), 1);

    // The pass fires once the delay elapses, primary transport only.
    settle(Duration::from_secs(31)).await;
    assert_eq!(primary.sent_count(), 2);
    assert_eq!(fallback.sent_count(), 1);

    // One pass per persist event: the emptied log stays quiet.
    settle(Duration::from_secs(120)).await;
    assert_eq!(primary.sent_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn pending_entries_survive_restart_and_retry_on_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    // First run: the primary channel is down, one batch lands in the
    // durable store.
    {
        let primary = Arc::new(ScriptedTransport::always_failing());
        let pipeline = Pipeline::with_transports(
            Some(fast_config()),
            Arc::new(pulse_agent::FileStateStore::new(&path)),
            Arc::new(FixedProbe::default()),
            primary.clone(),
            Arc::new(ScriptedTransport::always_failing()),
        )
        .unwrap();
        pipeline.collect_activity_now();
        settle(Duration::from_millis(10)).await;
        assert_eq!(primary.sent_count(), 1);
    }

    // Second run against the same file: connectivity-restored drains the
    // log through the primary transport only.
    let primary = Arc::new(ScriptedTransport::always_confirming());
    let fallback = Arc::new(ScriptedTransport::always_confirming());
    let store = Arc::new(pulse_agent::FileStateStore::new(&path));
    let pipeline = Pipeline::with_transports(
        Some(fast_config()),
        store,
        Arc::new(FixedProbe::default()),
        primary.clone(),
        fallback.clone(),
    )
    .unwrap();
    let handle = pipeline.start();

    handle.notify(HostEvent::ConnectivityRestored);
    settle(Duration::from_millis(100)).await;

    assert_eq!(primary.sent_count(), 1);
    assert_eq!(fallback.sent_count(), 0);

    // The log is now empty: a second reconnect retries nothing.
    handle.notify(HostEvent::ConnectivityRestored);
    settle(Duration::from_millis(100)).await;
    assert_eq!(primary.sent_count(), 1);

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn device_identity_is_stable_across_runs() {
    let store = Arc::new(MemoryStateStore::new());
    let probe = Arc::new(FixedProbe::default());
    let primary = Arc::new(ScriptedTransport::always_confirming());

    for _ in 0..2 {
        let pipeline = Pipeline::with_transports(
            Some(fast_config()),
            store.clone(),
            probe.clone(),
            primary.clone(),
            Arc::new(ScriptedTransport::always_failing()),
        )
        .unwrap();
        pipeline.collect_activity_now();
        settle(Duration::from_millis(10)).await;
    }

    // One device-token write; the second run reused the persisted token.
    assert_eq!(store.write_count(), 1);
}
