/// Transport tier errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("endpoint returned status {status}")]
    StatusFailure { status: u16 },

    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("request could not be built: {reason}")]
    RequestBuild { reason: String },
}
