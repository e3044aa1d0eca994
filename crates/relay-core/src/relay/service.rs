//! Relay service - wires the pipeline into one request-handling contract.

use std::sync::Arc;

use tracing::{info, warn};

use super::config::RelayConfig;
use super::credentials::ApiKeys;
use super::dispatcher::{DispatchOutcome, Dispatcher};
use super::limiter::{Decision, RateLimiter};
use super::shard;
use crate::domain::{DispatchPayload, Identity, Submission};
use crate::error::RelayError;
use crate::ports::{Clock, CounterStore, WebhookTransport};

/// One inbound relay request, as seen by the core.
#[derive(Debug, Clone, Copy)]
pub struct InboundRequest<'a> {
    /// Presented API credential, if any.
    pub credential: Option<&'a str>,
    /// Raw JSON body.
    pub body: &'a [u8],
    /// Network origin used when the body carries no identity.
    pub origin: Option<&'a str>,
}

/// A successful relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub identity: Identity,
    pub shard: usize,
    pub status: u16,
}

/// Composition root of the relay pipeline.
///
/// `received -> authenticated -> parsed -> admitted -> dispatched`, stopping at
/// the first failing step. Holds no per-request state; all cross-request state
/// lives in the counter store.
pub struct RelayService {
    config: Arc<RelayConfig>,
    api_keys: ApiKeys,
    limiter: RateLimiter,
    dispatcher: Dispatcher,
}

impl RelayService {
    pub fn new(
        config: Arc<RelayConfig>,
        store: Arc<dyn CounterStore>,
        transport: Arc<dyn WebhookTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let api_keys = ApiKeys::new(config.api_keys.iter().cloned());
        if api_keys.is_empty() {
            warn!("No API keys configured - every relay request will be rejected");
        }
        if config.endpoints.is_empty() {
            warn!("No webhook endpoints configured - relay requests will fail");
        }

        let limiter = RateLimiter::new(store, clock, config.rate_limit.clone());
        let dispatcher = Dispatcher::new(transport, config.dispatch.attempt_timeout);

        Self {
            config,
            api_keys,
            limiter,
            dispatcher,
        }
    }

    /// Check a presented credential against the configured keys.
    pub fn authenticate(&self, credential: Option<&str>) -> Result<(), RelayError> {
        self.api_keys.verify(credential)
    }

    /// Run one request through the pipeline.
    ///
    /// Authentication happens before anything else touches the body, the
    /// counter store or the network.
    pub async fn handle(&self, request: InboundRequest<'_>) -> Result<Delivery, RelayError> {
        self.authenticate(request.credential)?;

        let submission = Submission::parse(request.body)?;
        let identity = Identity::resolve(submission.identity.as_deref(), request.origin)?;
        let payload = DispatchPayload::from_submission(
            submission,
            &self.config.username,
            self.config.max_content_chars,
            &self.config.empty_content,
        )?;

        if let Decision::Rejected(window) = self.limiter.admit(&identity).await? {
            return Err(RelayError::RateLimited {
                window,
                retry_after: self.limiter.retry_after(window),
            });
        }

        let endpoints = &self.config.endpoints;
        let start = shard::select(&identity, endpoints.len())?;

        match self
            .dispatcher
            .dispatch(&payload, endpoints, start, self.config.dispatch.max_attempts)
            .await
        {
            DispatchOutcome::Delivered { shard, status } => {
                info!(identity = %identity, shard, status, "Message relayed");
                Ok(Delivery {
                    identity,
                    shard,
                    status,
                })
            }
            DispatchOutcome::Exhausted { attempts } => {
                warn!(identity = %identity, start, attempts, "All webhook attempts failed");
                Err(RelayError::Exhausted { attempts })
            }
        }
    }
}
