//! Envelope construction for both transport tiers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use pulse_core::constants::MAX_ENCODED_PAYLOAD_CHARS;
use pulse_core::{Batch, DispatchEnvelope, PipelineConfig};
use serde_json::json;

/// Builds wire envelopes from batches. One per pipeline, carrying the
/// config identifiers and the device token.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    comm_key: String,
    channel_id: String,
    app_name: String,
    version: String,
    device_id: String,
    data_cap: usize,
}

impl EnvelopeBuilder {
    pub fn new(config: &PipelineConfig, device_id: &str) -> Self {
        Self {
            comm_key: config.comm_key.clone(),
            channel_id: config.channel_id.clone(),
            app_name: config.app_name.clone(),
            version: config.version.clone(),
            device_id: device_id.to_string(),
            data_cap: MAX_ENCODED_PAYLOAD_CHARS,
        }
    }

    #[cfg(test)]
    pub fn with_data_cap(mut self, cap: usize) -> Self {
        self.data_cap = cap;
        self
    }

    /// Encode `{batch, system, version}` to base64 and cap it at the
    /// configured limit. The ingest side owns the limit; an oversize batch
    /// arrives truncated rather than rejected.
    pub fn build(&self, batch: &Batch) -> DispatchEnvelope {
        let inner = json!({
            "batch": batch,
            "system": self.app_name,
            "version": self.version,
        });
        let mut data = STANDARD.encode(inner.to_string());
        data.truncate(self.data_cap);

        DispatchEnvelope {
            key: self.comm_key.clone(),
            channel: self.channel_id.clone(),
            data,
            timestamp: Utc::now().timestamp_millis(),
            device: self.device_id.clone(),
        }
    }
}
