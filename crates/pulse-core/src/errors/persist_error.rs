/// Durable state store errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("state read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("state write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("stored value under {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}
