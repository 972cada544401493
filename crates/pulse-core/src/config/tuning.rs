use serde::{Deserialize, Serialize};

use crate::constants;

/// Timing and capacity tunables.
///
/// The half-store eviction and the fixed-delay sequential retry are
/// deliberate choices, exposed as tunables rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineTuning {
    /// Queue length that triggers a flush.
    pub flush_threshold: usize,
    /// Durable retry store capacity.
    pub store_capacity: usize,
    /// Delay before the one-shot environment collection (seconds).
    pub environment_delay_secs: u64,
    /// Activity collection interval while visible (seconds).
    pub activity_interval_secs: u64,
    /// Delay between a persist event and its retry pass (seconds).
    pub retry_delay_secs: u64,
    /// Spacing between sequential retry attempts (milliseconds).
    pub retry_spacing_ms: u64,
    /// Delay between visibility-regain and the immediate collection (ms).
    pub visibility_resume_delay_ms: u64,
    /// Per-request transport timeout (seconds).
    pub request_timeout_secs: u64,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            flush_threshold: constants::DEFAULT_FLUSH_THRESHOLD,
            store_capacity: constants::DEFAULT_STORE_CAPACITY,
            environment_delay_secs: constants::DEFAULT_ENVIRONMENT_DELAY_SECS,
            activity_interval_secs: constants::DEFAULT_ACTIVITY_INTERVAL_SECS,
            retry_delay_secs: constants::DEFAULT_RETRY_DELAY_SECS,
            retry_spacing_ms: constants::DEFAULT_RETRY_SPACING_MS,
            visibility_resume_delay_ms: constants::DEFAULT_VISIBILITY_RESUME_DELAY_MS,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
