/// Snapshot collection errors.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("attribute {attribute} unreadable: {reason}")]
    AttributeUnreadable { attribute: String, reason: String },

    #[error("attribute {attribute} unavailable on this host")]
    AttributeUnavailable { attribute: String },
}

impl CollectionError {
    /// Convenience constructor for probe read failures.
    pub fn unreadable(attribute: &str, reason: impl ToString) -> Self {
        Self::AttributeUnreadable {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for attributes the host cannot provide.
    pub fn unavailable(attribute: &str) -> Self {
        Self::AttributeUnavailable {
            attribute: attribute.to_string(),
        }
    }
}
