//! Pipeline configuration supplied by the host application.
//!
//! The configuration is the feature gate for the whole pipeline: a host
//! that has no config constructs the pipeline with `None` and every entry
//! point becomes a no-op.

mod tuning;

pub use tuning::PipelineTuning;

use serde::{Deserialize, Serialize};

use crate::errors::{PulseError, PulseResult};

/// Endpoints for the two transport tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Primary channel: structured JSON POST, status-checked.
    pub primary_url: String,
    /// Fallback channel: multipart POST, response never inspected.
    pub fallback_url: String,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Service key sent in every primary envelope.
    pub comm_key: String,
    /// Channel identifier sent in every primary envelope.
    pub channel_id: String,
    /// Host application name, embedded in the encoded payload.
    pub app_name: String,
    /// Host application version, embedded in the encoded payload.
    pub version: String,
    pub endpoints: Endpoints,
    #[serde(default)]
    pub tuning: PipelineTuning,
}

impl PipelineConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> PulseResult<Self> {
        toml::from_str(raw).map_err(|e| PulseError::Config {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let raw = r#"
            comm_key = "k-123"
            channel_id = "ch-9"
            app_name = "fitness-coach"
            version = "2.4.0"

            [endpoints]
            primary_url = "https://api.service-helper.net/message"
            fallback_url = "https://secure-data-relay.com/endpoint"
        "#;
        let config = PipelineConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.comm_key, "k-123");
        assert_eq!(config.tuning.flush_threshold, 5);
    }

    #[test]
    fn tuning_overrides_apply() {
        let raw = r#"
            comm_key = "k"
            channel_id = "c"
            app_name = "a"
            version = "1"

            [endpoints]
            primary_url = "https://p.example/m"
            fallback_url = "https://f.example/e"

            [tuning]
            flush_threshold = 3
            store_capacity = 8
        "#;
        let config = PipelineConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.tuning.flush_threshold, 3);
        assert_eq!(config.tuning.store_capacity, 8);
    }
}
