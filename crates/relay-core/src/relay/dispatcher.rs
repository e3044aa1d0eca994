//! Failover dispatch across webhook endpoints.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{DispatchPayload, Endpoint};
use crate::ports::{TransportError, WebhookTransport};

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// An endpoint answered 2xx.
    Delivered { shard: usize, status: u16 },
    /// Every attempted endpoint failed.
    Exhausted { attempts: usize },
}

/// Why a single attempt did not deliver. Every kind moves on to the next endpoint.
#[derive(Debug)]
pub enum AttemptFailure {
    Throttled(u16),
    ServerError(u16),
    Rejected(u16),
    Transport(TransportError),
}

impl AttemptFailure {
    /// `None` for a 2xx status.
    fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            429 => Some(Self::Throttled(status)),
            500..=599 => Some(Self::ServerError(status)),
            _ => Some(Self::Rejected(status)),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throttled(status) => write!(f, "throttled ({status})"),
            Self::ServerError(status) => write!(f, "server error ({status})"),
            Self::Rejected(status) => write!(f, "rejected ({status})"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

/// Sends a payload, walking endpoints from a start shard until one accepts it.
///
/// Stateless between requests. Each endpoint is tried at most once per call,
/// with no delay between attempts. An attempt that outlives `attempt_timeout`
/// is abandoned and counted as a transport timeout, whatever the transport does.
pub struct Dispatcher {
    transport: Arc<dyn WebhookTransport>,
    attempt_timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, attempt_timeout: Duration) -> Self {
        Self {
            transport,
            attempt_timeout,
        }
    }

    pub async fn dispatch(
        &self,
        payload: &DispatchPayload,
        endpoints: &[Endpoint],
        start_index: usize,
        max_attempts: usize,
    ) -> DispatchOutcome {
        let mut attempts = 0;

        for (shard, endpoint) in rotated(endpoints, start_index).take(max_attempts) {
            attempts += 1;

            let sent = tokio::time::timeout(
                self.attempt_timeout,
                self.transport.send(endpoint, payload, self.attempt_timeout),
            )
            .await
            .unwrap_or(Err(TransportError::Timeout));

            let failure = match sent {
                Ok(status) => match AttemptFailure::from_status(status) {
                    None => {
                        debug!(shard, status, attempts, "Webhook accepted message");
                        return DispatchOutcome::Delivered { shard, status };
                    }
                    Some(failure) => failure,
                },
                Err(e) => AttemptFailure::Transport(e),
            };

            warn!(
                shard,
                endpoint = %endpoint,
                attempt = attempts,
                reason = %failure,
                "Webhook attempt failed, failing over"
            );
        }

        DispatchOutcome::Exhausted { attempts }
    }
}

/// Every endpoint exactly once, starting at `start` and wrapping around.
fn rotated(endpoints: &[Endpoint], start: usize) -> impl Iterator<Item = (usize, &Endpoint)> {
    let len = endpoints.len();
    let start = if len == 0 { 0 } else { start % len };
    (0..len).map(move |offset| {
        let idx = (start + offset) % len;
        (idx, &endpoints[idx])
    })
}
