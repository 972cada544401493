use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::DispatchEnvelope;

/// Outcome of a single transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Whether the endpoint confirmed receipt. The fallback channel always
    /// reports `false`: its response is never inspected.
    pub confirmed: bool,
}

/// One transport tier.
#[async_trait]
pub trait ITransport: Send + Sync {
    async fn send(&self, envelope: &DispatchEnvelope) -> Result<DeliveryReceipt, TransportError>;
}
