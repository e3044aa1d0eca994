//! reqwest-backed webhook transport.

use std::time::Duration;

use async_trait::async_trait;

use relay_core::domain::{DispatchPayload, Endpoint};
use relay_core::ports::{TransportError, WebhookTransport};

/// Posts payloads as JSON over HTTP.
///
/// The underlying client pools connections per host; it keeps no
/// request-level state, so one caller's failure never leaks into another's.
#[derive(Clone)]
pub struct HttpWebhookTransport {
    client: reqwest::Client,
}

impl HttpWebhookTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("relay-guard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhookTransport {
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: &DispatchPayload,
        timeout: Duration,
    ) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(endpoint.url())
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                endpoint = %endpoint,
                status = status.as_u16(),
                body = %body,
                "Webhook returned error status"
            );
        }

        Ok(status.as_u16())
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}
