//! # pulse-agent
//!
//! Client-side background pipeline that captures structured snapshots of
//! runtime/environment state, buffers them in a bounded queue, and delivers
//! them through tiered transports with a durable, restart-surviving retry
//! log.
//!
//! The pipeline is fire-and-forget from the host's point of view: every
//! error is contained at the layer where it occurs and nothing surfaces in
//! the host UI. Construction without a [`PipelineConfig`] yields a disabled
//! pipeline whose entry points are all no-ops.
//!
//! ```no_run
//! use std::sync::Arc;
//! use pulse_agent::{FileStateStore, Pipeline, SystemProbe};
//! use pulse_core::PipelineConfig;
//!
//! # async fn example(config: PipelineConfig) -> pulse_core::PulseResult<()> {
//! let store = Arc::new(FileStateStore::new("pulse-state.json"));
//! let pipeline = Pipeline::new(Some(config), store, Arc::new(SystemProbe::default()))?;
//! let handle = pipeline.start();
//! // ... host runs ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod collect;
pub mod deliver;
pub mod identity;
pub mod logging;
pub mod pipeline;
pub mod probe;
pub mod queue;
pub mod store;

pub use deliver::{DeliveryCoordinator, DeliveryOutcome};
pub use identity::IdentityManager;
pub use pipeline::{HostEvent, Pipeline, PipelineHandle};
pub use probe::SystemProbe;
pub use queue::IngestionQueue;
pub use store::{DurableRetryStore, FileStateStore};
