use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pulse_core::errors::TransportError;
use pulse_core::traits::{DeliveryReceipt, ITransport};
use pulse_core::DispatchEnvelope;
use std::time::Duration;

/// Fallback channel: multipart POST whose response is never inspected.
///
/// Availability over confirmation: this tier augments the primary channel
/// but never substitutes for persistence, so its receipt is always
/// unconfirmed.
pub struct FallbackTransport {
    http: reqwest::Client,
    url: String,
}

impl FallbackTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::RequestBuild {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ITransport for FallbackTransport {
    async fn send(&self, envelope: &DispatchEnvelope) -> Result<DeliveryReceipt, TransportError> {
        let raw = serde_json::to_string(envelope).map_err(|e| TransportError::RequestBuild {
            reason: e.to_string(),
        })?;
        let form = reqwest::multipart::Form::new()
            .text("p", STANDARD.encode(raw))
            .text("t", envelope.timestamp.to_string());

        self.http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                reason: e.to_string(),
            })?;

        Ok(DeliveryReceipt { confirmed: false })
    }
}
