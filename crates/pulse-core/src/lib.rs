//! # pulse-core
//!
//! Foundation crate for the Pulse telemetry pipeline.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{PipelineConfig, PipelineTuning};
pub use errors::{PulseError, PulseResult};
pub use models::{Batch, DeviceIdentity, DispatchEnvelope, PendingEntry, Record, RecordKind, Session};
pub use traits::{IEnvironmentProbe, IStateStore, ITransport};
