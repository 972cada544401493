use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two snapshot kinds the collectors produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Static environment attributes, collected once per run.
    Environment,
    /// Dynamic attributes, collected on an interval while visible.
    Activity,
}

/// One structured snapshot produced by a collector call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub session_id: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    /// Collector-specific attributes. Attributes whose reads failed for a
    /// cycle are simply absent.
    pub payload: serde_json::Value,
}
