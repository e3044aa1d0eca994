//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use relay_core::RelayService;
use relay_core::ports::{CounterStore, SystemClock};
use relay_infra::{HttpWebhookTransport, InMemoryCounterStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let store = counter_store(config).await?;
        let transport = HttpWebhookTransport::new().map_err(io::Error::other)?;

        let relay_config = Arc::new(config.relay.clone());
        tracing::info!(
            endpoints = relay_config.endpoints.len(),
            short_limit = relay_config.rate_limit.short.max_requests,
            long_limit = relay_config.rate_limit.long.max_requests,
            max_attempts = relay_config.dispatch.max_attempts,
            latency_budget_ms = relay_config.dispatch.latency_budget().as_millis() as u64,
            on_store_failure = ?relay_config.rate_limit.on_store_failure,
            "Relay configured"
        );

        let relay = RelayService::new(
            relay_config,
            store,
            Arc::new(transport),
            Arc::new(SystemClock),
        );

        tracing::info!("Application state initialized");

        Ok(Self {
            relay: Arc::new(relay),
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[cfg(feature = "redis")]
async fn counter_store(config: &AppConfig) -> io::Result<Arc<dyn CounterStore>> {
    use relay_infra::RedisCounterStore;

    match RedisCounterStore::new(config.redis.clone()).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.redis.fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis: {}. Using in-memory counters (per-process limits).",
                e
            );
            Ok(Arc::new(InMemoryCounterStore::new()))
        }
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(not(feature = "redis"))]
async fn counter_store(_config: &AppConfig) -> io::Result<Arc<dyn CounterStore>> {
    tracing::info!("Running without redis feature - using in-memory counters");
    Ok(Arc::new(InMemoryCounterStore::new()))
}
