//! Device identity and session minting.
//!
//! The device token is read-or-create: derived once from environment
//! descriptors, persisted under one state-store key, and never regenerated
//! unless the store itself is cleared externally. Session ids are minted
//! fresh per process start and never persisted.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use pulse_core::constants::{DEVICE_ID_KEY, DEVICE_TOKEN_LEN, FINGERPRINT_AGENT_LEN, SESSION_ID_PREFIX};
use pulse_core::errors::PersistenceError;
use pulse_core::{DeviceIdentity, IEnvironmentProbe, IStateStore, Session};

/// Derives and persists the installation identity.
pub struct IdentityManager {
    store: Arc<dyn IStateStore>,
}

impl IdentityManager {
    pub fn new(store: Arc<dyn IStateStore>) -> Self {
        Self { store }
    }

    /// Read the persisted device token, or derive, persist, and return a
    /// fresh one. Deterministic for a given probe within one installation.
    pub fn get_or_create_device_id(
        &self,
        probe: &dyn IEnvironmentProbe,
    ) -> Result<DeviceIdentity, PersistenceError> {
        if let Some(id) = self.store.get(DEVICE_ID_KEY)? {
            return Ok(DeviceIdentity {
                id,
                created_at: Utc::now(),
            });
        }

        let id = derive_fingerprint(probe);
        self.store.set(DEVICE_ID_KEY, &id)?;
        tracing::info!("identity: minted device token");
        Ok(DeviceIdentity {
            id,
            created_at: Utc::now(),
        })
    }

    /// Mint a fresh per-run session: time-based prefix plus random suffix.
    pub fn new_session_id(&self) -> Session {
        let now = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Session {
            id: format!(
                "{}{}{}",
                SESSION_ID_PREFIX,
                to_base36(now.timestamp_millis() as u64),
                &suffix[..8]
            ),
            started_at: now,
        }
    }
}

/// Composite fingerprint: truncated agent string, logical core count,
/// screen geometry, timezone offset, joined and base64-compacted. Probe
/// reads that fail contribute an empty component rather than aborting.
pub fn derive_fingerprint(probe: &dyn IEnvironmentProbe) -> String {
    let agent = probe
        .agent_string()
        .map(|a| a.chars().take(FINGERPRINT_AGENT_LEN).collect::<String>())
        .unwrap_or_default();
    let cores = probe
        .logical_cores()
        .map(|c| c.to_string())
        .unwrap_or_default();
    let screen = probe
        .screen_geometry()
        .map(|(w, h)| format!("{w}x{h}"))
        .unwrap_or_default();
    let tz = probe
        .timezone_offset_minutes()
        .map(|o| o.to_string())
        .unwrap_or_default();

    let composite = [agent, cores, screen, tz].join("|");
    let encoded = STANDARD.encode(composite.as_bytes());
    encoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(DEVICE_TOKEN_LEN)
        .collect()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::{FixedProbe, MemoryStateStore};

    #[test]
    fn device_id_is_idempotent() {
        let store = Arc::new(MemoryStateStore::new());
        let manager = IdentityManager::new(store.clone());
        let probe = FixedProbe::default();

        let first = manager.get_or_create_device_id(&probe).unwrap();
        let second = manager.get_or_create_device_id(&probe).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn device_token_is_compact_alphanumeric() {
        let store = Arc::new(MemoryStateStore::new());
        let manager = IdentityManager::new(store);
        let id = manager
            .get_or_create_device_id(&FixedProbe::default())
            .unwrap()
            .id;
        assert_eq!(id.len(), DEVICE_TOKEN_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn device_id_survives_probe_failures() {
        let store = Arc::new(MemoryStateStore::new());
        let manager = IdentityManager::new(store);
        let probe = FixedProbe::all_failing();
        let id = manager.get_or_create_device_id(&probe).unwrap().id;
        // Empty components still base64-encode to something stable.
        assert!(!id.is_empty());
    }

    #[test]
    fn session_ids_are_unique_and_prefixed() {
        let manager = IdentityManager::new(Arc::new(MemoryStateStore::new()));
        let a = manager.new_session_id();
        let b = manager.new_session_id();
        assert!(a.id.starts_with(SESSION_ID_PREFIX));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn base36_round_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
