use async_trait::async_trait;
use pulse_core::constants::{SERVICE_HEADER, SERVICE_HEADER_VALUE};
use pulse_core::errors::TransportError;
use pulse_core::traits::{DeliveryReceipt, ITransport};
use pulse_core::DispatchEnvelope;
use std::time::Duration;

/// Primary channel: JSON POST, success defined strictly by the response
/// status.
pub struct PrimaryTransport {
    http: reqwest::Client,
    url: String,
}

impl PrimaryTransport {
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
impl ITransport for PrimaryTransport {
    async fn send(&self, envelope: &DispatchEnvelope) -> Result<DeliveryReceipt, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .header(SERVICE_HEADER, SERVICE_HEADER_VALUE)
            .json(envelope)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(DeliveryReceipt { confirmed: true })
        } else {
            Err(TransportError::StatusFailure {
                status: status.as_u16(),
            })
        }
    }
}
