//! Dual-window rate limiter.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::config::{RateLimitConfig, StoreFailurePolicy, WindowLimit};
use crate::domain::{Identity, WindowKind};
use crate::error::RelayError;
use crate::ports::{Clock, CounterStore, StoreError};

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admitted,
    Rejected(WindowKind),
}

/// Per-identity admission under a short and a long fixed window.
///
/// Each window is a counter keyed by `(identity, floor(now / window))`. The
/// short window is checked first and the long window only if the short one
/// passes.
///
/// Over-limit increments are never rolled back: a rejected request still
/// consumes a slot in its window, so a client hammering retries stays
/// rejected until the window rolls over. Do not "fix" this into a rollback.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
        config: RateLimitConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Count this request against both windows and decide.
    ///
    /// Fails with [`RelayError::StoreUnavailable`] only when the store is down
    /// and the policy is fail-closed.
    pub async fn admit(&self, identity: &Identity) -> Result<Decision, RelayError> {
        let now = self.clock.now().timestamp();

        for (kind, limit) in [
            (WindowKind::Short, self.config.short),
            (WindowKind::Long, self.config.long),
        ] {
            let key = self.bucket_key(identity, kind, limit.window, now);

            let count = match self.store.increment(&key, limit.window).await {
                Ok(count) => count,
                Err(e) => return self.on_store_failure(identity, e),
            };

            if exceeds(count, &limit) {
                debug!(
                    identity = %identity,
                    window = %kind,
                    count,
                    limit = limit.max_requests,
                    "Rate limit exceeded"
                );
                return Ok(Decision::Rejected(kind));
            }
        }

        Ok(Decision::Admitted)
    }

    /// Time until the current `kind` window rolls over, at least one second.
    pub fn retry_after(&self, kind: WindowKind) -> Duration {
        let limit = match kind {
            WindowKind::Short => self.config.short,
            WindowKind::Long => self.config.long,
        };
        let window_secs = limit.window.as_secs().max(1);
        let now = self.clock.now().timestamp();
        let elapsed = now.rem_euclid(i64::try_from(window_secs).unwrap_or(i64::MAX)) as u64;
        Duration::from_secs(window_secs - elapsed)
    }

    fn bucket_key(&self, identity: &Identity, kind: WindowKind, window: Duration, now: i64) -> String {
        let window_secs = i64::try_from(window.as_secs().max(1)).unwrap_or(i64::MAX);
        let bucket = now.div_euclid(window_secs);
        format!("{}:{}:{}:{}", self.config.key_prefix, identity, kind.tag(), bucket)
    }

    fn on_store_failure(&self, identity: &Identity, err: StoreError) -> Result<Decision, RelayError> {
        match self.config.on_store_failure {
            StoreFailurePolicy::FailClosed => {
                error!(identity = %identity, error = %err, "Counter store unavailable, failing closed");
                Err(RelayError::StoreUnavailable(err.to_string()))
            }
            StoreFailurePolicy::FailOpen => {
                warn!(identity = %identity, error = %err, "Counter store unavailable, failing open");
                Ok(Decision::Admitted)
            }
        }
    }
}

fn exceeds(count: u64, limit: &WindowLimit) -> bool {
    count > limit.max_requests
}
