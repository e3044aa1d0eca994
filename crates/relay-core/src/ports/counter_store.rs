//! Counter store port.

use async_trait::async_trait;
use std::time::Duration;

/// Atomic counter backend shared by every relay instance.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` and return the post-increment count.
    ///
    /// When the increment creates the counter (the result is 1) the store sets
    /// its expiry to `ttl`. Later increments never touch the expiry. Both steps
    /// must happen atomically in the backend.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, StoreError>;
}

/// Counter store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Operation failed: {0}")]
    Operation(String),
}
