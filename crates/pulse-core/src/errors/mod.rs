//! Error taxonomy for the pipeline.
//!
//! Four kinds, each contained at the layer where it occurs: collection
//! errors skip one cycle, transport errors fall through to the next tier,
//! persistence errors are swallowed after logging, and a missing config is
//! a gate rather than an error. Nothing propagates to the host.

mod collect_error;
mod persist_error;
mod transport_error;

pub use collect_error::CollectionError;
pub use persist_error::PersistenceError;
pub use transport_error::TransportError;

/// Unified error for fallible pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

/// Result alias used across the workspace.
pub type PulseResult<T> = Result<T, PulseError>;
