//! Outbound webhook transport port.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{DispatchPayload, Endpoint};

/// Sends one payload to one endpoint.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `payload` to `endpoint`, giving up after `timeout`.
    ///
    /// The dispatcher also cuts every attempt at the same deadline, so a
    /// transport that ignores `timeout` still cannot stretch a request.
    ///
    /// Returns the HTTP status code whenever a response arrived, whatever its
    /// class. Status classification belongs to the dispatcher.
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: &DispatchPayload,
        timeout: Duration,
    ) -> Result<u16, TransportError>;
}

/// Failures that prevented any HTTP response from arriving.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(String),
}
