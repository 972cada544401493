use serde::{Deserialize, Serialize};

/// Wire body for the primary channel, also carried verbatim inside the
/// fallback channel's `p` multipart field.
///
/// `data` is the base64-encoded `{batch, system, version}` JSON, capped at
/// the configured character limit by the payload encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEnvelope {
    pub key: String,
    pub channel: String,
    pub data: String,
    /// Unix millis at envelope build time.
    pub timestamp: i64,
    pub device: String,
}
