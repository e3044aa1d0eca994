//! Spy and stub ports shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{DispatchPayload, Endpoint};
use crate::ports::{Clock, CounterStore, StoreError, TransportError, WebhookTransport};

/// Counter store that records every call and every expiry it set.
#[derive(Default)]
pub struct SpyCounterStore {
    counts: Mutex<HashMap<String, u64>>,
    pub expiries: Mutex<Vec<(String, Duration)>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl SpyCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn count(&self, key: &str) -> u64 {
        self.counts.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl CounterStore for SpyCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("connection refused".to_string()));
        }

        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.expiries.lock().unwrap().push((key.to_string(), ttl));
        }
        Ok(*count)
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// 2024-03-01 12:00:10 UTC, ten seconds into a minute.
    pub fn new() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 10).unwrap())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Transport answering with a scripted result per endpoint URL.
///
/// Endpoints without a script answer 200.
#[derive(Default)]
pub struct ScriptedTransport {
    script: HashMap<String, Result<u16, ()>>,
    pub calls: Mutex<Vec<String>>,
    pub payloads: Mutex<Vec<DispatchPayload>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16) -> Self {
        self.script.insert(url.to_string(), Ok(status));
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.script.insert(url.to_string(), Err(()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: &DispatchPayload,
        _timeout: Duration,
    ) -> Result<u16, TransportError> {
        self.calls.lock().unwrap().push(endpoint.url().to_string());
        self.payloads.lock().unwrap().push(payload.clone());

        match self.script.get(endpoint.url()) {
            Some(Ok(status)) => Ok(*status),
            Some(Err(())) => Err(TransportError::Connection("connection refused".to_string())),
            None => Ok(200),
        }
    }
}

pub fn endpoints(n: usize) -> Vec<Endpoint> {
    (0..n)
        .map(|i| Endpoint::new(format!("https://hooks.test/{i}")))
        .collect()
}
