use serde::{Deserialize, Serialize};

use crate::errors::CollectionError;

/// Battery state as reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerStatus {
    pub level_percent: u8,
    pub charging: bool,
}

/// Process memory usage in megabytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_mb: u64,
    pub total_mb: u64,
}

/// Read access to host environment attributes.
///
/// Every read is individually fallible. Collectors catch each failure,
/// log it at debug, and skip that attribute for the cycle; a failed read
/// never stops a collection timer.
pub trait IEnvironmentProbe: Send + Sync {
    // --- Static environment ---
    fn agent_string(&self) -> Result<String, CollectionError>;
    fn platform(&self) -> Result<String, CollectionError>;
    fn locale(&self) -> Result<String, CollectionError>;
    fn timezone_name(&self) -> Result<String, CollectionError>;
    fn timezone_offset_minutes(&self) -> Result<i32, CollectionError>;
    fn logical_cores(&self) -> Result<usize, CollectionError>;
    fn screen_geometry(&self) -> Result<(u32, u32), CollectionError>;

    // --- Dynamic activity ---
    fn is_online(&self) -> Result<bool, CollectionError>;
    fn is_focused(&self) -> Result<bool, CollectionError>;
    fn power(&self) -> Result<PowerStatus, CollectionError>;
    fn memory_usage(&self) -> Result<MemoryUsage, CollectionError>;
}
