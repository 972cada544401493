//! Data model: identity, records, batches, pending retry entries.

mod batch;
mod envelope;
mod identity;
mod pending;
mod record;

pub use batch::Batch;
pub use envelope::DispatchEnvelope;
pub use identity::{DeviceIdentity, Session};
pub use pending::PendingEntry;
pub use record::{Record, RecordKind};
