//! Trait seams: state store, transport, environment probe.
//!
//! Each seam has one production implementation in `pulse-agent` and one
//! scripted implementation in `test-fixtures`.

mod probe;
mod state_store;
mod transport;

pub use probe::{IEnvironmentProbe, MemoryUsage, PowerStatus};
pub use state_store::IStateStore;
pub use transport::{DeliveryReceipt, ITransport};
