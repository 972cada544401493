//! Snapshot collectors.
//!
//! Two kinds: a one-shot environment snapshot (static attributes) and a
//! recurring activity snapshot (dynamic attributes). Every attribute read
//! is individually fallible; a failed read is logged at debug and skipped
//! for that cycle only, so a bad probe can never stop a collection timer.

use chrono::Utc;
use pulse_core::constants::RECORD_AGENT_LEN;
use pulse_core::errors::CollectionError;
use pulse_core::{DeviceIdentity, IEnvironmentProbe, Record, RecordKind, Session};
use serde_json::{json, Map, Value};

/// Insert `key` if the read succeeded, otherwise log and skip.
fn put<T: Into<Value>>(
    payload: &mut Map<String, Value>,
    key: &str,
    read: Result<T, CollectionError>,
) {
    match read {
        Ok(value) => {
            payload.insert(key.to_string(), value.into());
        }
        Err(e) => tracing::debug!("collect: skipping {key}: {e}"),
    }
}

/// Static environment attributes, collected once per run after the start
/// delay.
pub fn collect_environment(
    probe: &dyn IEnvironmentProbe,
    session: &Session,
    device: &DeviceIdentity,
) -> Record {
    let mut payload = Map::new();
    put(&mut payload, "platform", probe.platform());
    put(
        &mut payload,
        "agent",
        probe
            .agent_string()
            .map(|a| a.chars().take(RECORD_AGENT_LEN).collect::<String>()),
    );
    put(
        &mut payload,
        "screen",
        probe.screen_geometry().map(|(w, h)| format!("{w}x{h}")),
    );
    put(&mut payload, "language", probe.locale());
    put(&mut payload, "timezone", probe.timezone_name());
    put(&mut payload, "online", probe.is_online());

    Record {
        kind: RecordKind::Environment,
        session_id: session.id.clone(),
        device_id: device.id.clone(),
        timestamp: Utc::now(),
        payload: Value::Object(payload),
    }
}

/// Dynamic attributes, collected on the activity interval while visible,
/// on visibility-regain, and best-effort on shutdown.
pub fn collect_activity(
    probe: &dyn IEnvironmentProbe,
    session: &Session,
    device: &DeviceIdentity,
) -> Record {
    let mut payload = Map::new();
    put(&mut payload, "focus", probe.is_focused());
    put(
        &mut payload,
        "network",
        probe
            .is_online()
            .map(|online| if online { "online" } else { "offline" }),
    );
    put(
        &mut payload,
        "battery",
        probe
            .power()
            .map(|p| json!({ "level": p.level_percent, "charging": p.charging })),
    );
    put(
        &mut payload,
        "memory",
        probe
            .memory_usage()
            .map(|m| json!({ "used": m.used_mb, "total": m.total_mb })),
    );

    Record {
        kind: RecordKind::Activity,
        session_id: session.id.clone(),
        device_id: device.id.clone(),
        timestamp: Utc::now(),
        payload: Value::Object(payload),
    }
}
