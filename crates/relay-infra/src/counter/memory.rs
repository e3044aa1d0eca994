//! In-memory counter store - used as fallback when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use relay_core::ports::{CounterStore, StoreError};

/// Smallest map size at which expired counters are swept.
const SWEEP_THRESHOLD: usize = 10_000;

struct Counter {
    count: u64,
    expires_at: Instant,
}

struct Counters {
    entries: HashMap<String, Counter>,
    /// Map size that triggers the next sweep.
    next_sweep_at: usize,
}

/// In-memory counter store using a HashMap behind an async Mutex.
///
/// This is the fallback implementation when Redis is not available.
/// Note: Counts are per-process, not shared across relay instances, and are
/// lost on restart.
///
/// Expired counters are swept when the map reaches twice its size after the
/// previous sweep, so sweeping stays amortized O(1) per increment even with
/// many live counters.
pub struct InMemoryCounterStore {
    counters: Mutex<Counters>,
    sweep_threshold: usize,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::with_sweep_threshold(SWEEP_THRESHOLD)
    }

    fn with_sweep_threshold(sweep_threshold: usize) -> Self {
        Self {
            counters: Mutex::new(Counters {
                entries: HashMap::new(),
                next_sweep_at: sweep_threshold,
            }),
            sweep_threshold,
        }
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        let now = Instant::now();
        // Single lock acquisition makes increment-and-expire atomic.
        let mut counters = self.counters.lock().await;

        if counters.entries.len() >= counters.next_sweep_at {
            counters.entries.retain(|_, c| c.expires_at > now);
            counters.next_sweep_at = (counters.entries.len() * 2).max(self.sweep_threshold);
        }

        let counter = counters.entries.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: now + ttl,
        });
        if counter.expires_at <= now {
            counter.count = 0;
            counter.expires_at = now + ttl;
        }
        counter.count += 1;

        Ok(counter.count)
    }
}
