//! Shared fixtures for pipeline tests: an in-memory state store, a
//! scripted transport, a fixed environment probe, and model builders.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use pulse_core::errors::{CollectionError, PersistenceError, TransportError};
use pulse_core::traits::{DeliveryReceipt, MemoryUsage, PowerStatus};
use pulse_core::{
    Batch, DeviceIdentity, DispatchEnvelope, IEnvironmentProbe, IStateStore, ITransport,
    PipelineConfig, Record, RecordKind, Session,
};

// --- State store ---------------------------------------------------------

/// In-memory `IStateStore` with a write counter and failure switches.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    map: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl IStateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: "simulated write failure".to_string(),
            });
        }
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

// --- Transport -----------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum TransportMode {
    /// `Ok` with a confirmed receipt.
    Confirm,
    /// `Ok` with an unconfirmed receipt (fallback contract).
    Unconfirmed,
    /// Network error on every send.
    Fail,
}

/// Scripted `ITransport` that records every send attempt.
pub struct ScriptedTransport {
    mode: TransportMode,
    fail_next: AtomicUsize,
    sent: Mutex<Vec<i64>>,
}

impl ScriptedTransport {
    pub fn always_confirming() -> Self {
        Self::with_mode(TransportMode::Confirm)
    }

    pub fn always_unconfirmed() -> Self {
        Self::with_mode(TransportMode::Unconfirmed)
    }

    pub fn always_failing() -> Self {
        Self::with_mode(TransportMode::Fail)
    }

    fn with_mode(mode: TransportMode) -> Self {
        Self {
            mode,
            fail_next: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next `n` sends regardless of mode.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::Relaxed);
    }

    /// Total send attempts, including failed ones.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// The `seq` marker of the first record of each sent batch, in send
    /// order. `-1` for batches without a marker.
    pub fn sent_seqs(&self) -> Vec<i64> {
        self.sent.lock().unwrap().clone()
    }
}

/// Recover the `seq` marker from an encoded envelope.
fn envelope_seq(envelope: &DispatchEnvelope) -> i64 {
    let Ok(decoded) = STANDARD.decode(&envelope.data) else {
        return -1;
    };
    let Ok(inner) = serde_json::from_slice::<serde_json::Value>(&decoded) else {
        return -1;
    };
    inner["batch"]["records"][0]["payload"]["seq"]
        .as_i64()
        .unwrap_or(-1)
}

#[async_trait]
impl ITransport for ScriptedTransport {
    async fn send(&self, envelope: &DispatchEnvelope) -> Result<DeliveryReceipt, TransportError> {
        self.sent.lock().unwrap().push(envelope_seq(envelope));

        let forced_fail = self
            .fail_next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if forced_fail {
            return Err(TransportError::Network {
                reason: "scripted failure".to_string(),
            });
        }

        match self.mode {
            TransportMode::Confirm => Ok(DeliveryReceipt { confirmed: true }),
            TransportMode::Unconfirmed => Ok(DeliveryReceipt { confirmed: false }),
            TransportMode::Fail => Err(TransportError::Network {
                reason: "scripted failure".to_string(),
            }),
        }
    }
}

// --- Probe ---------------------------------------------------------------

/// Probe returning fixed values, with per-attribute failure switches.
#[derive(Debug, Default)]
pub struct FixedProbe {
    failing: HashSet<String>,
    fail_all: bool,
}

impl FixedProbe {
    /// Every attribute read fails.
    pub fn all_failing() -> Self {
        Self {
            failing: HashSet::new(),
            fail_all: true,
        }
    }

    /// Fail one named attribute: `agent`, `platform`, `locale`,
    /// `timezone`, `timezone_offset`, `cores`, `screen`, `online`,
    /// `focus`, `battery`, `memory`.
    #[must_use]
    pub fn failing_attribute(mut self, attribute: &str) -> Self {
        self.failing.insert(attribute.to_string());
        self
    }

    fn read<T>(&self, attribute: &str, value: T) -> Result<T, CollectionError> {
        if self.fail_all || self.failing.contains(attribute) {
            Err(CollectionError::unreadable(attribute, "scripted failure"))
        } else {
            Ok(value)
        }
    }
}

impl IEnvironmentProbe for FixedProbe {
    fn agent_string(&self) -> Result<String, CollectionError> {
        self.read("agent", "TestAgent/1.0 (fixture)".to_string())
    }

    fn platform(&self) -> Result<String, CollectionError> {
        self.read("platform", "linux".to_string())
    }

    fn locale(&self) -> Result<String, CollectionError> {
        self.read("locale", "en-US".to_string())
    }

    fn timezone_name(&self) -> Result<String, CollectionError> {
        self.read("timezone", "+00:00".to_string())
    }

    fn timezone_offset_minutes(&self) -> Result<i32, CollectionError> {
        self.read("timezone_offset", 0)
    }

    fn logical_cores(&self) -> Result<usize, CollectionError> {
        self.read("cores", 8)
    }

    fn screen_geometry(&self) -> Result<(u32, u32), CollectionError> {
        self.read("screen", (1920, 1080))
    }

    fn is_online(&self) -> Result<bool, CollectionError> {
        self.read("online", true)
    }

    fn is_focused(&self) -> Result<bool, CollectionError> {
        self.read("focus", true)
    }

    fn power(&self) -> Result<PowerStatus, CollectionError> {
        self.read(
            "battery",
            PowerStatus {
                level_percent: 80,
                charging: true,
            },
        )
    }

    fn memory_usage(&self) -> Result<MemoryUsage, CollectionError> {
        self.read(
            "memory",
            MemoryUsage {
                used_mb: 512,
                total_mb: 16384,
            },
        )
    }
}

// --- Builders ------------------------------------------------------------

pub fn sample_session() -> Session {
    Session {
        id: "SESS_fixture00".to_string(),
        started_at: Utc::now(),
    }
}

pub fn sample_device() -> DeviceIdentity {
    DeviceIdentity {
        id: "devfixture0000000000".to_string(),
        created_at: Utc::now(),
    }
}

/// A minimal activity record tagged with a `seq` marker for ordering
/// assertions.
pub fn sample_record(seq: i64) -> Record {
    Record {
        kind: RecordKind::Activity,
        session_id: sample_session().id,
        device_id: sample_device().id,
        timestamp: Utc::now(),
        payload: serde_json::json!({ "seq": seq }),
    }
}

pub fn sample_batch(seq: i64) -> Batch {
    Batch::new(vec![sample_record(seq)])
}

pub fn sample_config() -> PipelineConfig {
    PipelineConfig::from_toml_str(
        r#"
        comm_key = "test-key"
        channel_id = "test-channel"
        app_name = "test-app"
        version = "0.0.1"

        [endpoints]
        primary_url = "https://primary.invalid/message"
        fallback_url = "https://fallback.invalid/endpoint"
        "#,
    )
    .expect("fixture config parses")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_reads_fail_independently() {
        let probe = FixedProbe::default().failing_attribute("timezone");
        assert!(probe.timezone_name().is_err());
        assert!(probe.timezone_offset_minutes().is_ok());

        let probe = FixedProbe::default().failing_attribute("timezone_offset");
        assert!(probe.timezone_name().is_ok());
        assert!(probe.timezone_offset_minutes().is_err());
    }
}
