use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable installation identity.
///
/// Immutable once created; persists indefinitely across sessions. It is
/// regenerated only if the backing state store is cleared externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Opaque fingerprint token.
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Ephemeral per-run session. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
}
